use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotmatrix_gb::{EmulatorConfig, GameBoy, JoypadInput, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "Usage: dotmatrix <program_path> <out_rgb24_path> [frames] [--trace]";

fn main() -> Result<()> {
    env_logger::init();

    let mut trace = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--trace" => trace = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(program_path), Some(out_path)) = (positional.next(), positional.next()) else {
        bail!("{USAGE}");
    };
    let program_path = PathBuf::from(program_path);
    let out_path = PathBuf::from(out_path);
    let frames: u32 = match positional.next() {
        Some(frames) => frames
            .parse()
            .with_context(|| format!("invalid frame count '{frames}'"))?,
        None => 120,
    };

    let program = std::fs::read(&program_path)
        .with_context(|| format!("failed to read program '{}'", program_path.display()))?;

    let config = EmulatorConfig::builder().trace_instructions(trace).build();
    let mut gb = GameBoy::with_config(config);
    gb.load_program(&program)
        .with_context(|| format!("failed to load '{}'", program_path.display()))?;

    let input = JoypadInput::new();
    let mut cycles = 0u64;
    for frame in 0..frames {
        let retired = gb
            .step_frame(&input)
            .with_context(|| format!("emulation stopped in frame {frame}"))?;
        cycles += u64::from(retired);
    }
    log::info!(
        "ran {frames} frames of {} ({cycles} machine cycles)",
        gb.config().cycles_per_frame
    );

    let buffer = gb.frame_buffer().as_bytes();
    std::fs::write(&out_path, buffer)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;

    println!(
        "Wrote {} bytes ({}x{} rgb24) after {} frames to '{}'",
        buffer.len(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        frames,
        out_path.display()
    );
    Ok(())
}
