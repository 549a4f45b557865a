mod app;
mod config;
mod games;
mod input;
mod model;
mod render;
mod sim;
mod speech;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
