//! Lists the rolls of an Exif4Film export and dumps their exposures
//!
//! ```bash
//! e4f-tool [--format xmp|text|json] [--dump] [--list] [--roll N] [--wrapper] <FILE>
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use log::{debug, info};

use e4f::base::BoxResult;
use e4f::model::ExposedRoll;
use e4f::text::{exposure_to_text, roll_summary};
use e4f::{project_exposure, Database, XmpOptions, XmpPacket};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// XMP packet (RDF/XML)
    Xmp,
    /// Human readable summary
    Text,
    /// Projected properties as JSON
    Json,
}

/// Exif4Film export tool
#[derive(Parser, Debug)]
#[clap(name = "e4f-tool")]
#[clap(about = "Convert Exif4Film exports to XMP metadata")]
struct Args {
    /// Output format of --dump
    #[clap(long, value_enum, default_value = "xmp")]
    format: Format,

    /// Dump the exposures of the selected rolls
    #[clap(long)]
    dump: bool,

    /// List the selected rolls
    #[clap(long)]
    list: bool,

    /// Roll number in the export (0 = all)
    #[clap(long, default_value = "0")]
    roll: usize,

    /// Surround XMP packets with the xpacket processing instructions
    #[clap(long)]
    wrapper: bool,

    /// Exif4Film XML export
    #[clap(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> BoxResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let (db, report) = match Database::open(&args.file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("e4f-tool: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "{}: {} rolls, {} exposures ({} coercion failures, {} ignored elements, {} id collisions)",
        args.file.display(),
        db.exposed_rolls.len(),
        db.exposures.len(),
        report.coercion_failures.len(),
        report.ignored_elements,
        report.collisions.len()
    );
    debug!("{} ids shared across kinds", db.shared_ids().len());

    let mut rolls: Vec<&ExposedRoll> = if args.roll > 0 {
        match db.exposed_rolls.get(args.roll - 1) {
            Some(roll) => vec![roll],
            None => Args::command()
                .error(
                    clap::error::ErrorKind::InvalidValue,
                    format!(
                        "roll {} is out of range (the export has {} rolls)",
                        args.roll,
                        db.exposed_rolls.len()
                    ),
                )
                .exit(),
        }
    } else {
        db.exposed_rolls.iter().collect()
    };
    rolls.sort_by(|a, b| a.description.cmp(&b.description));

    let options = XmpOptions {
        omit_packet_wrapper: !args.wrapper,
        ..Default::default()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (ix, roll) in rolls.iter().enumerate() {
        if args.list {
            writeln!(out, "Roll {}:", ix + 1)?;
            writeln!(out, "{}\n", roll_summary(&db, roll))?;
        }

        if !args.dump {
            continue;
        }

        for (index, exposure) in db.exposures_for_roll(roll.id).into_iter().enumerate() {
            match args.format {
                Format::Xmp => {
                    let properties = project_exposure(&db, roll, exposure, index);
                    let packet = XmpPacket::from_properties(&properties);
                    writeln!(out, "{}", packet.serialize(&options)?)?;
                }
                Format::Text => writeln!(out, "{}", exposure_to_text(&db, exposure, index))?,
                Format::Json => {
                    let properties = project_exposure(&db, roll, exposure, index);
                    writeln!(out, "{}", serde_json::to_string_pretty(&properties)?)?;
                }
            }
        }
    }

    Ok(())
}
