//! Perch Runtime
//!
//! Boots the catalog, the AR session and the placement shell, then drives
//! the shell from the terminal: one command per line, one refresh after each.

mod shell;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use perch_asset::{AssetCatalog, FsModelLoader};
use perch_core::math::{Pose, Vec2};
use perch_core::time::RefreshClock;
use perch_render::{
    ArSession, DeviceCapabilities, PlaneAlignment, SceneHost, SessionConfig, SimulatedSession,
};
use perch_services::settings::SessionSettings;
use perch_services::{input::HELP, PlaneKind, UiCommand};
use tokio::runtime::Runtime;

use shell::Shell;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Perch v{}", perch_core::VERSION);
    tracing::info!("Initializing services...");
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = perch_services::init_services(settings_path.as_deref());

    let runtime = Runtime::new().context("failed to start the async runtime")?;

    let catalog = AssetCatalog::open(&settings.catalog, Arc::new(FsModelLoader), runtime.handle());
    tracing::info!(models = catalog.len(), "catalog ready");

    let session = SimulatedSession::new(DeviceCapabilities::default());
    let config = session_config(&settings.session, &session.capabilities());
    let host = SceneHost::new(session, &config);

    let clock = RefreshClock::with_rate(settings.runtime.refresh_rate_hz);
    let mut shell = Shell::new(catalog, host, clock);

    tracing::info!(
        pending = shell.catalog().pending_count(),
        "Runtime initialized successfully"
    );
    println!("{}", shell.view());

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<UiCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == UiCommand::Quit {
            break;
        }
        apply(&mut shell, &runtime, command);
        shell.refresh();
        tracing::debug!(
            mode = ?shell.view_mode(),
            state = ?shell.controller().state(),
            "view refreshed"
        );
        println!("{}", shell.view());
    }

    tracing::info!(
        anchors = shell.host().scene().anchor_count(),
        ticks = shell.clock().tick_count(),
        uptime = ?shell.clock().total_time(),
        "shutting down"
    );
    Ok(())
}

/// Run one command against the shell. Rejected actions are reported, not fatal.
fn apply(shell: &mut Shell<SimulatedSession>, runtime: &Runtime, command: UiCommand) {
    let result = match command {
        UiCommand::List | UiCommand::Quit => Ok(()),
        UiCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        UiCommand::Select(model) => shell.select(&model).map(|_| ()),
        UiCommand::Cancel => shell.cancel(),
        UiCommand::Confirm => shell.confirm(),
        UiCommand::Plane { kind, position } => {
            let alignment = match kind {
                PlaneKind::Horizontal => PlaneAlignment::Horizontal,
                PlaneKind::Vertical => PlaneAlignment::Vertical,
            };
            let detected = shell.host_mut().session_mut().detect_plane(
                alignment,
                Pose::from_translation(position),
                Vec2::ONE,
            );
            match detected {
                Some(id) => println!("detected {id}"),
                None => println!("{alignment:?} planes are not being detected"),
            }
            Ok(())
        }
        UiCommand::Tick(count) => {
            for _ in 0..count {
                shell.refresh();
                std::thread::sleep(shell.clock().tick_duration());
            }
            Ok(())
        }
        UiCommand::Wait => {
            runtime.block_on(shell.wait_for_loads());
            Ok(())
        }
        UiCommand::Scene => {
            print_scene(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "command rejected");
        println!("{e}");
    }
}

fn print_scene(shell: &Shell<SimulatedSession>) {
    let scene = shell.host().scene();
    println!(
        "{} anchor(s), {} model(s), tracking: {:?}",
        scene.anchor_count(),
        scene.instance_count(),
        shell.host().session().tracking_state()
    );
    for anchor in scene.anchors() {
        for instance in anchor.children() {
            let pose = anchor.pose().mul_pose(&instance.root.transform);
            println!(
                "  {} on {} at {}: {} ({} nodes)",
                anchor.id(),
                anchor.plane(),
                pose.translation,
                instance.source().display(),
                instance.root.node_count()
            );
        }
    }
}

/// World-tracking configuration from settings, limited to what the device supports
fn session_config(settings: &SessionSettings, capabilities: &DeviceCapabilities) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.plane_detection.horizontal = settings.horizontal_planes;
    config.plane_detection.vertical = settings.vertical_planes;
    config.environment_texturing = settings.environment_texturing;

    if settings.scene_reconstruction {
        config = config.with_mesh_if_supported(capabilities);
    }
    config.restricted_to(capabilities)
}
