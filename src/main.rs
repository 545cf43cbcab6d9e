use std::process::ExitCode;

use outline_particles::{window, RunError, SceneConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: outline-particles <scene.json>");
        return ExitCode::FAILURE;
    };

    let result = SceneConfig::load(&path)
        .map_err(RunError::from)
        .and_then(|scene| window::run(&scene));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
