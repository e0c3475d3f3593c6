mod app;
mod cli;
mod config;
mod controller;
mod edit;
mod error;
mod image;
mod logging;
mod render;
mod util;

use app::EditorApp;
use clap::Parser;
use cli::Args;
use config::AppConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match args.config.as_deref() {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err:#}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load(),
    };

    if args.output.is_some() {
        return cli::run(&args, &config);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    let initial_image = args.image;
    let result = eframe::run_native(
        "imgtweak",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(EditorApp::new(
                &cc.egui_ctx,
                config,
                initial_image.as_deref(),
            )))
        }),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "editor window failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
