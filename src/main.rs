mod app;
mod carousel;
mod catalog;
mod config;
mod engine;
mod mpris;
mod progress;
mod relay;
mod runtime;
mod tracker;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
