use diesel::pg::PgConnection;
use diesel::{Connection, ConnectionError};

use crate::config::DbSettings;

/// Renders the settings as a libpq keyword/value string. Unset password and
/// host are left out so libpq applies its own defaults.
pub fn connection_string(settings: &DbSettings) -> String {
    let mut parts = vec![
        format!("user={}", quote(&settings.user)),
        format!("port={}", settings.port),
        format!("dbname={}", quote(&settings.database)),
    ];
    if let Some(password) = &settings.password {
        parts.push(format!("password={}", quote(password)));
    }
    if let Some(host) = &settings.host {
        parts.push(format!("host={}", quote(host)));
    }
    parts.join(" ")
}

pub fn establish(settings: &DbSettings) -> Result<PgConnection, ConnectionError> {
    PgConnection::establish(&connection_string(settings))
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
