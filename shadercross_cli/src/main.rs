//! Shader cross-compilation CLI
//!
//! Operates on binary IR files: translates them to a target shading
//! language, prints reflection documents, or dumps the decoded
//! instruction stream.

use clap::{Parser, Subcommand, ValueEnum};
use shadercross::{
    spv, translator_for, AttributeMap, IrModule, IrReflector, OutputBuffer, Reflector,
    ShaderStage, Target, TargetLang, TargetSystem,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "shadercross")]
#[command(about = "Shader cross-compilation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate binary IR to a target shading language
    Translate {
        /// Input binary IR file
        input: PathBuf,

        /// Target language
        #[arg(short, long, value_enum)]
        target: TargetArg,

        /// Target language version (per-language default when omitted)
        #[arg(long)]
        version: Option<i32>,

        /// Constrained (ES) profile
        #[arg(long)]
        es: bool,

        /// Destination platform
        #[arg(long, value_enum, default_value = "unknown")]
        system: SystemArg,

        /// Pipeline stage (deduced from the input file name when omitted)
        #[arg(short, long, value_enum)]
        stage: Option<StageArg>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the reflection document as JSON
    Reflect {
        /// Input binary IR file
        input: PathBuf,
    },

    /// List the decoded header fields and instruction stream
    Dump {
        /// Input binary IR file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    #[value(name = "spirv")]
    SpirV,
    Glsl,
    Hlsl,
    Metal,
    Agal,
    #[value(name = "varlist")]
    VarList,
}

impl From<TargetArg> for TargetLang {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::SpirV => TargetLang::SpirV,
            TargetArg::Glsl => TargetLang::Glsl,
            TargetArg::Hlsl => TargetLang::Hlsl,
            TargetArg::Metal => TargetLang::Metal,
            TargetArg::Agal => TargetLang::Agal,
            TargetArg::VarList => TargetLang::VarList,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SystemArg {
    Windows,
    #[value(name = "windows-app")]
    WindowsApp,
    Macos,
    Linux,
    Ios,
    Android,
    Html5,
    Flash,
    Unity,
    Unknown,
}

impl From<SystemArg> for TargetSystem {
    fn from(s: SystemArg) -> Self {
        match s {
            SystemArg::Windows => TargetSystem::Windows,
            SystemArg::WindowsApp => TargetSystem::WindowsApp,
            SystemArg::Macos => TargetSystem::MacOs,
            SystemArg::Linux => TargetSystem::Linux,
            SystemArg::Ios => TargetSystem::Ios,
            SystemArg::Android => TargetSystem::Android,
            SystemArg::Html5 => TargetSystem::Html5,
            SystemArg::Flash => TargetSystem::Flash,
            SystemArg::Unity => TargetSystem::Unity,
            SystemArg::Unknown => TargetSystem::Unknown,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StageArg {
    Vert,
    Tesc,
    Tese,
    Geom,
    Frag,
    Comp,
}

impl From<StageArg> for ShaderStage {
    fn from(s: StageArg) -> Self {
        match s {
            StageArg::Vert => ShaderStage::Vertex,
            StageArg::Tesc => ShaderStage::TessControl,
            StageArg::Tese => ShaderStage::TessEvaluation,
            StageArg::Geom => ShaderStage::Geometry,
            StageArg::Frag => ShaderStage::Fragment,
            StageArg::Comp => ShaderStage::Compute,
        }
    }
}

fn read_module(input: &Path) -> Result<IrModule, String> {
    let bytes =
        std::fs::read(input).map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    IrModule::from_bytes(&bytes).map_err(|e| format!("{}", e))
}

/// Deduces the stage from names like `shadow.frag.spv`
fn stage_from_file_name(input: &Path) -> ShaderStage {
    match input.file_stem() {
        Some(stem) => ShaderStage::from_file_name(&stem.to_string_lossy()),
        None => ShaderStage::Vertex,
    }
}

fn translate(
    input: PathBuf,
    target: TargetArg,
    version: Option<i32>,
    es: bool,
    system: SystemArg,
    stage: Option<StageArg>,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let module = read_module(&input)?;
    let stage = stage
        .map(ShaderStage::from)
        .unwrap_or_else(|| stage_from_file_name(&input));
    let lang = TargetLang::from(target);
    let target = Target {
        lang,
        version: version.unwrap_or(0),
        es,
        system: system.into(),
    }
    .normalized();

    let translator = translator_for(lang).map_err(|e| format!("{}", e))?;
    let source_name = input.to_string_lossy().into_owned();
    let output_name = match &output {
        Some(path) => path.to_string_lossy().into_owned(),
        None => format!("{}.{}", stage.extension(), lang.extension()),
    };

    let mut out = OutputBuffer::new();
    let mut attributes = AttributeMap::new();
    translator
        .produce(
            &module,
            stage,
            &target,
            &source_name,
            &output_name,
            &mut out,
            &mut attributes,
        )
        .map_err(|e| format!("{}", e))?;

    let text = out.into_string();
    if let Some(output) = output {
        std::fs::write(&output, text.as_bytes())
            .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;
        eprintln!("Translated {} -> {}", input.display(), output.display());
        for (name, location) in &attributes {
            eprintln!("  attribute {name} = {location}");
        }
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn reflect(input: PathBuf) -> Result<(), String> {
    let module = read_module(&input)?;
    let document = IrReflector
        .reflect(&module)
        .map_err(|e| format!("{}", e))?;
    let json = document.to_json().map_err(|e| format!("{}", e))?;
    println!("{}", json);
    Ok(())
}

fn dump(input: PathBuf) -> Result<(), String> {
    let module = read_module(&input)?;
    println!(
        "version {}.{}, generator {}, bound {}, schema {}",
        module.version_major(),
        module.version_minor(),
        module.generator,
        module.bound,
        module.schema
    );
    for inst in module.instructions() {
        let name = match spv::opcode_name(inst.opcode) {
            Some(name) => name.to_string(),
            None => format!("Op#{}", inst.opcode),
        };
        let operands: Vec<String> = module
            .operands(inst)
            .iter()
            .map(|w| format!("0x{w:08x}"))
            .collect();
        if operands.is_empty() {
            println!("{name}");
        } else {
            println!("{name} {}", operands.join(" "));
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate {
            input,
            target,
            version,
            es,
            system,
            stage,
            output,
        } => translate(input, target, version, es, system, stage, output),
        Commands::Reflect { input } => reflect(input),
        Commands::Dump { input } => dump(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
