use std::io::{self, Read, Write};

use log::info;
use prost::Message;
use protoc_plugin_kit::{Plugin, PluginRequest, Result};

use crate::outline::OutlineGenerator;

mod outline;

fn main() {
    env_logger::init();
    if let Err(e) = faillible_main() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn faillible_main() -> Result<()> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    let request = PluginRequest::decode(&buf)?;
    let generator = OutlineGenerator::from_parameters(request.parameters());
    let response = Plugin::new(generator).generate(&request)?;
    info!("generated {} files", response.file.len());

    io::stdout().write_all(&response.encode_to_vec())?;
    io::stdout().flush()?;

    Ok(())
}
