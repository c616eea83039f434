use crate::external_api::report_portal_api::models::launch::Launch;

pub const CONFIG_DIR: &str = ".config/rpq";
pub const CONFIG_FILE: &str = "config.json";
pub const ENTER_INSTANCE_URL: &str = "Enter the url of the ReportPortal instance: ";
pub const ENTER_PROJECT_NAME: &str = "Enter the project name: ";
pub const ENTER_API_TOKEN: &str = "Enter the ReportPortal API token: ";

/// Standard message
#[derive(Debug)]
pub enum Message<'a> {
    ConfigSaved(String),
    LaunchLine(&'a Launch),
    PageSummary { shown: usize, total: u64 },
    FilterLine { name: &'a str, owner: &'a str, conditions: usize },
    NoFiltersFound(&'a str),
}

impl Message<'_> {
    pub fn to_formatted_string(&self) -> String {
        match self {
            Message::ConfigSaved(path) => format!("Config saved to {}", path),
            Message::LaunchLine(launch) => format!(
                "#{} {} [{}] started {}",
                launch.number,
                launch.name,
                launch.status,
                launch.start_time.as_datetime().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Message::PageSummary { shown, total } => {
                format!("Shown {} of {} launches", shown, total)
            }
            Message::FilterLine { name, owner, conditions } => {
                format!("{} (owner: {}, conditions: {})", name, owner, conditions)
            }
            Message::NoFiltersFound(name) => format!("No filters named '{}'", name),
        }
    }
}
