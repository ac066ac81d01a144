use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use umbra_core::io::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file or directory of frames
    pub input: PathBuf,

    /// Override the source frame rate (frames per second)
    #[arg(long)]
    pub frame_rate: Option<f64>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = open_source(&args.input, args.frame_rate)?;
    let info = source.info();

    println!("File:        {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);
    println!("Frame rate:  {:.3} fps", info.frame_rate);
    println!("Duration:    {:.2} s", info.duration());

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref tel) = info.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    Ok(())
}
