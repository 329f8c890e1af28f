use std::process::ExitCode;

use rb_discord_status::{
    PlayerSignals, PresenceBridge, Settings, clock::SystemClock, discord_rpc::DiscordRpc,
    logging::init_logging, notifications::DesktopNotifier,
};

fn main() -> ExitCode {
    init_logging();

    let settings = match Settings::load_default() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let client = DiscordRpc::new(&settings.app_id);
    let mut bridge = PresenceBridge::new(
        settings.clone(),
        client,
        Some(Box::new(DesktopNotifier)),
        Box::new(SystemClock),
    );
    let mut signals = PlayerSignals::new();

    if bridge.activate(&mut signals).is_err() {
        return ExitCode::FAILURE;
    }

    let result = run(&settings, &mut bridge, &mut signals);

    bridge.deactivate(&mut signals);

    result
}

#[cfg(target_os = "linux")]
fn run(
    settings: &Settings,
    bridge: &mut PresenceBridge<DiscordRpc>,
    signals: &mut PlayerSignals<PresenceBridge<DiscordRpc>>,
) -> ExitCode {
    use rb_discord_status::media_listener::listener;

    match listener(&settings.player, bridge, signals) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error listening for media: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn run(
    _settings: &Settings,
    _bridge: &mut PresenceBridge<DiscordRpc>,
    _signals: &mut PlayerSignals<PresenceBridge<DiscordRpc>>,
) -> ExitCode {
    tracing::error!("Listening to the player needs MPRIS, which is only available on Linux");
    ExitCode::FAILURE
}
