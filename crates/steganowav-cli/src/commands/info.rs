use std::path::PathBuf;

use clap::Args;
use steganowav_core::{commands, HidingParams};

use crate::CliResult;

/// Prints carrier and hiding figures for a WAV audio file
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// WAVE/PCM audio file to inspect
    #[arg(short = 'w', long = "wave", value_name = "wave file", required = true)]
    pub wave: PathBuf,

    /// Bits hidden per sample: 1, 2, 4 or 8; 0 picks one by sample size
    #[arg(short = 'd', long, value_name = "density", default_value_t = 0)]
    pub density: u8,

    /// Sample offset the figures are computed for
    #[arg(short = 'o', long, value_name = "offset", default_value_t = 0)]
    pub offset: u32,
}

impl InfoArgs {
    pub fn run(self) -> CliResult<()> {
        let params = HidingParams {
            density: self.density,
            sample_offset: self.offset,
            seed: 0,
        };

        let report = commands::info(&self.wave, &params)?;
        println!("{report}");

        Ok(())
    }
}
