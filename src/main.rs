use clap::Parser;
use std::io::Write;

use ptcbp::cli::{Cli, Commands, PrintArgs};
use ptcbp::error::Error;
use ptcbp::image_source::RgbImage;
use ptcbp::job::{ImageSource, Job, JobEntry};
use ptcbp::parser;
use ptcbp::status::Status;
use ptcbp::{job, Result};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Print(args) => handle_print(&args),
        Commands::Status(args) => handle_status(&args.output),
        Commands::Initialise(args) => handle_initialise(&args.output),
        Commands::Parse(args) => handle_parse(&args.input),
        Commands::ReadStatus(args) => handle_read_status(&args.input),
    }
}

fn handle_print(args: &PrintArgs) -> Result<()> {
    let options = args.to_print_options();
    let mut entries = Vec::new();

    for input in &args.inputs {
        let source = if input == "test" {
            ImageSource::TestPattern
        } else {
            ImageSource::Image(RgbImage::decode_png(std::path::Path::new(input))?)
        };
        entries.push(JobEntry { source, options: options.clone() });
    }

    let job = Job::new(entries);
    let bytes = job.compile()?;
    append_to_file(&args.output, &bytes)
}

fn handle_status(output: &std::path::Path) -> Result<()> {
    append_to_file(output, &job::status_request_stream())
}

fn handle_initialise(output: &std::path::Path) -> Result<()> {
    append_to_file(output, &job::initialise_stream())
}

fn handle_parse(input: &std::path::Path) -> Result<()> {
    let data = std::fs::read(input)?;
    for event in parser::parse(&data) {
        println!("{event:?}");
    }
    Ok(())
}

fn handle_read_status(input: &std::path::Path) -> Result<()> {
    let data = std::fs::read(input)?;
    let status = Status::parse(&data).map_err(Error::Decode)?;

    println!("model: {}", status.model_code());
    println!("battery: {}", status.battery_level());
    println!("extended error: {}", status.extended_error());
    println!("errors: {}", status.error_flags());
    println!("media width: {}", status.media_width());
    println!("media type: {}", status.media_type());
    println!("status type: {}", status.status_type());
    println!("phase: {}", status.phase());
    println!("notification: {}", status.notification_number());
    println!("tape colour: {}", status.tape_colour());
    println!("text colour: {}", status.text_colour());
    Ok(())
}

fn append_to_file(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(bytes)?;
    Ok(())
}
