pub const NOTIFICATION_TITLE: &str = "Rhythmbox Discord Status Plugin";

#[cfg_attr(target_os = "windows", allow(dead_code))]
const APP_NAME: &str = "rb-discord-status";

pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Freedesktop notifications. Failures are logged, never raised.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        #[cfg(not(target_os = "macos"))]
        {
            use notify_rust::Notification;

            let mut notification = Notification::new();

            notification.summary(title).body(body).timeout(10000);

            #[cfg(target_os = "linux")]
            notification.appname(APP_NAME).icon("rhythmbox");

            if let Err(e) = notification.show() {
                tracing::warn!("Error showing notification: {e:?}");
            }
        }

        #[cfg(target_os = "macos")]
        tracing::info!("{APP_NAME}: {title}: {body}");
    }
}
