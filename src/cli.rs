use crate::config::load_config;
use crate::diagram::FamilyDiagram;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_family;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "kintree", version, about = "Family tree diagram renderer in Rust")]
pub struct Args {
    /// Input file (.json with familyMembers/familyRelations) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Member id to anchor the tree at; omitted means "pick any"
    #[arg(short = 'r', long = "root")]
    pub root: Option<String>,

    /// Config file (json5: theme, themeVariables, layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write the positioned graph as JSON next to the regular output
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_family(&input)?;

    let mut diagram = FamilyDiagram::from_maps(parsed.members, parsed.relations, args.root.as_deref());
    diagram.theme = config.theme.clone();
    diagram.config = config.layout.clone();

    let layout = diagram.layout();
    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layout)?;
    }

    let svg = render_svg(&layout, &diagram.theme, &diagram.config);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => read_stdin(),
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn ensure_output(output: &Option<PathBuf>, format: &str) -> Result<PathBuf> {
    output
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Output path required for {format} output"))
}
