use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64) {
    info!(
        "CMD_START: {} by {}({}) in chat {}",
        command, user, user_id, chat_id
    );
}

/// Logs a decoded callback with consistent format
pub fn log_callback(data: &str, user: &str, user_id: i64, chat_id: i64) {
    info!(
        "CALLBACK: '{}' from {}({}) in chat {}",
        data, user, user_id, chat_id
    );
}

/// Logs a conversation state change
pub fn log_flow_transition(user_id: i64, from: &str, to: &str) {
    debug!("FLOW: user {} {} -> {}", user_id, from, to);
}

/// Logs an intent the current flow state cannot accept
pub fn log_flow_rejected(user_id: i64, intent: &str, reason: &str) {
    warn!("FLOW_REJECTED: user {} intent {} - {}", user_id, intent, reason);
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str) {
    error!("DB_ERROR: {} on {} failed: {}", operation, table, error);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
