//! Picture catalogue service backed by the in-memory record store by default.

fn main() -> std::process::ExitCode {
    server::bootstrap::launch(service::records::EntityProfile::picture())
}
