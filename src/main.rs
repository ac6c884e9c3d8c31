//! Pi-cam-preview binary: open camera 0, show a live 1280x720 preview,
//! run until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;
use pi_cam_preview::{session, CameraDevice, FfplayPreview, StreamConfig, V4L2Device};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    let mut device = V4L2Device::open(0)?;
    info!(
        "device: {} ({})",
        device.capabilities().card,
        device.capabilities().driver
    );

    let config = StreamConfig::preview(session::PREVIEW_SIZE);
    let mut preview = FfplayPreview::new();

    session::run(&mut device, &mut preview, &config, &shutdown)?;
    info!("preview stopped");
    Ok(())
}
