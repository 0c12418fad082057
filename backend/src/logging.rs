use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer, EnvFilter, Registry};
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "warn,backend=info,shared=info";

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.push_str(&format!("{:?}", value));
        } else if !field.name().starts_with("log.") {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else if !field.name().starts_with("log.") {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

impl MessageVisitor {
    fn line(&self) -> String {
        if self.fields.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.fields.join(", "))
        }
    }
}

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        if metadata.target().starts_with("hyper") {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if visitor.message.is_empty() {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = visitor.line();

        match metadata.level().as_str() {
            "ERROR" => eprintln!("[{}] ❌ Error: {} - {}", timestamp, metadata.target(), line),
            "WARN" => eprintln!("[{}] ⚠️ Warning: {} - {}", timestamp, metadata.target(), line),
            "INFO" => println!("[{}] ℹ️ {} - {}", timestamp, metadata.target(), line),
            "DEBUG" => println!("[{}] 🔄 {} - {}", timestamp, metadata.target(), line),
            _ => {}
        }
    }
}

/// Installs the console subscriber. `RUST_LOG` overrides the default filter;
/// `log` records from the shared crate are bridged in as well.
pub fn setup() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = Registry::default()
        .with(env_filter)
        .with(ConsoleLayer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logging was already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses_and_names_crates() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        let directives: Vec<&str> = DEFAULT_FILTER.split(',').collect();
        assert_eq!(directives, ["warn", "backend=info", "shared=info"]);
    }
}
