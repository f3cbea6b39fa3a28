//! Reverse a sequence file.
//!
//! Usage: cargo run --example reverse_sequence <input.seq> <output.seq> [strategy]

use std::fs::File;

use reframe::{SequenceFile, Strategy, TransformOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let input = args.next().ok_or("usage: reverse_sequence <input> <output> [strategy]")?;
    let output = args.next().ok_or("usage: reverse_sequence <input> <output> [strategy]")?;
    let strategy = match args.next().as_deref() {
        Some("fast") => Strategy::Fast,
        Some("small") => Strategy::Small,
        _ => Strategy::Balanced,
    };

    let mut sequence = SequenceFile::open(&input)?;
    println!(
        "Reversing {} frame(s) of {}x{}x{} with {strategy:?}",
        sequence.header().frame_count,
        sequence.header().channels,
        sequence.header().height,
        sequence.header().width,
    );

    let mut destination = File::create(&output)?;
    sequence.copy_header_to(&mut destination)?;

    let options = TransformOptions::new().with_strategy(strategy);
    sequence.timeline().reverse(&mut destination, &options)?;

    println!("Wrote {output}");
    Ok(())
}
