use askama::Template;
use floodwatch_core::{
    entities::*,
    usecases::{FloodAlert, FloodAlertFormatter},
};
use std::time::Duration;

pub const DEFAULT_ALERT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct AlertFormatter {
    pub delay: Duration,
    pub image: Option<String>,
}

impl Default for AlertFormatter {
    fn default() -> Self {
        Self {
            delay: DEFAULT_ALERT_DELAY,
            image: None,
        }
    }
}

#[derive(Template)]
#[template(path = "flood_alert/title.txt")]
struct FloodAlertTitleTemplate {
    severity: Severity,
}

#[derive(Template)]
#[template(path = "flood_alert/body.txt")]
struct FloodAlertBodyTemplate<'a> {
    date: &'a str,
    severity: Severity,
}

fn render<T: Template>(tpl: &T, fallback: impl FnOnce() -> String) -> String {
    tpl.render().unwrap_or_else(|err| {
        log::warn!("Could not render template: {err}");
        fallback()
    })
}

impl FloodAlertFormatter for AlertFormatter {
    fn format_alert(&self, alert: &FloodAlert) -> LocalNotification {
        let FloodAlert { date, severity } = alert;
        let severity = *severity;
        let title = render(&FloodAlertTitleTemplate { severity }, || {
            format!("Flood Alert: {severity} Flooding Predicted")
        });
        let body = render(&FloodAlertBodyTemplate { date, severity }, || {
            format!("Flooding predicted on {date}. Severity: {severity}.")
        });
        LocalNotification {
            title,
            body,
            image: self.image.clone(),
            trigger_after: self.delay,
        }
    }
}
