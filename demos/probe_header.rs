//! Print a sequence file's header and validation report.
//!
//! Usage: cargo run --example probe_header <input.seq>

use reframe::SequenceFile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = std::env::args()
        .nth(1)
        .ok_or("usage: probe_header <input.seq>")?;

    let sequence = SequenceFile::open(&input)?;
    let header = sequence.header();

    println!("Frames:     {}", header.frame_count);
    println!("Dimensions: {}x{}", header.width, header.height);
    println!("Channels:   {}", header.channels);
    println!("Frame size: {} bytes", header.frame_size());
    println!("Payload:    {} bytes", header.payload_size());
    println!();
    print!("{}", sequence.validate());

    Ok(())
}
