//! Song catalogue service backed by the document store by default.

fn main() -> std::process::ExitCode {
    server::bootstrap::launch(service::records::EntityProfile::song())
}
