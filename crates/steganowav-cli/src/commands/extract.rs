use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use log::info;
use steganowav_core::{commands, HidingParams};

use crate::CliResult;

/// Extracts hidden data from a WAV audio file
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// WAVE/PCM audio file that carries hidden data
    #[arg(short = 'w', long = "wave", value_name = "wave file", required = true)]
    pub wave: PathBuf,

    /// File the recovered data is written to, stdout when omitted
    #[arg(short = 'O', long = "out", value_name = "output file")]
    pub out: Option<PathBuf>,

    /// Bits hidden per sample: 1, 2, 4 or 8; 0 picks one by sample size
    #[arg(short = 'd', long, value_name = "density", default_value_t = 0)]
    pub density: u8,

    /// Starting sample index used when the data was hidden
    #[arg(
        short = 'o',
        long,
        value_name = "offset",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub offset: u32,

    /// Keystream seed used when the data was hidden, 0 disables
    #[arg(short = 's', long, value_name = "seed", default_value_t = 0)]
    pub seed: u8,
}

impl ExtractArgs {
    pub fn run(self) -> CliResult<()> {
        let params = HidingParams {
            density: self.density,
            sample_offset: self.offset,
            seed: self.seed,
        };

        let recovered = match &self.out {
            Some(path) => commands::extract_to_file(&self.wave, &params, path)?,
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                let n = commands::extract(&self.wave, &params, &mut lock)?;
                lock.flush().ok();
                n
            }
        };

        info!("recovered {recovered} bytes from {:?}", self.wave);
        Ok(())
    }
}
