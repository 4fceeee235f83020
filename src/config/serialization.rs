//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# textproc configuration

# Theme: dark, light, nord
theme = "{theme}"

# Input limits
[session]
# Maximum input length in characters (pasted text is truncated to this)
max_length = {max_length}

# Processing backend
[processor]
# mock: deterministic stand-in ("Mock processed text: ...")
# failing: always fails (shows the error path)
# remote: POST to `endpoint` (see `textproc serve`)
kind = "{kind}"
# Simulated latency for mock/failing, in milliseconds
delay_ms = {delay_ms}
endpoint = "{endpoint}"
timeout_secs = {timeout_secs}

# Clipboard access
[clipboard]
# Use an in-memory clipboard when the system clipboard is unavailable
fallback = {fallback}

# HTTP processing endpoint for `textproc serve`
[server]
bind_addr = "{bind_addr}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            max_length = self.session.max_length,
            kind = self.processor.kind.as_str(),
            delay_ms = self.processor.delay_ms,
            endpoint = self.processor.endpoint,
            timeout_secs = self.processor.timeout_secs,
            fallback = self.clipboard.fallback,
            bind_addr = self.server.bind_addr,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
