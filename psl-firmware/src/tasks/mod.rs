// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Kommandos fließen über einen Channel: UDP → Light.

pub mod light;
pub mod mdns;
pub mod udp;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use light::light_task;
pub use mdns::mdns_responder_task;
pub use udp::udp_command_task;
pub use wifi::{connection_task, dhcp_task, net_task};
