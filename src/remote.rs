//! Remote control bridge: owns the server and its runtime. The frame loop
//! applies queued commands before the update and publishes a snapshot after
//! the frame is drawn.

use std::net::SocketAddr;

use tokio::runtime::Runtime;
use vitrine_remote::{RemoteCommand, RemoteServer, ServerConfig};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::inspector::Inspector;

/// Remote server plus the runtime it runs on
pub struct RemoteBridge {
    // Dropped before the runtime so connections see the shutdown signal
    server: RemoteServer,
    _runtime: Runtime,
}

impl RemoteBridge {
    pub fn start(config: ServerConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vitrine-remote")
            .enable_all()
            .build()
            .map_err(|e| Error::Runtime(format!("failed to start remote runtime: {}", e)))?;
        let server = RemoteServer::start(runtime.handle(), config)?;
        Ok(Self {
            server,
            _runtime: runtime,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Drain queued commands into the inspector.
    pub fn apply_pending(&mut self, inspector: &mut Inspector) {
        for cmd in self.server.drain() {
            if let Err(e) = apply_command(inspector, cmd) {
                log::warn!("Remote command failed: {}", e);
            }
        }
    }

    /// Publish the inspector's snapshot for `GetState`.
    pub fn publish(&self, inspector: &Inspector) {
        self.server.publish(inspector.snapshot());
    }
}

/// Apply one queued command to the inspector.
pub fn apply_command(inspector: &mut Inspector, cmd: RemoteCommand) -> Result<()> {
    match cmd {
        RemoteCommand::SetView { name } => inspector.set_view(&name)?,
        RemoteCommand::CycleView { step } => inspector.cycle_view(step),
        RemoteCommand::ToggleZoom => inspector.toggle_zoom(),
        RemoteCommand::SetProjection { mode } => inspector.switch_projection(mode.parse()?),
        RemoteCommand::ToggleExplode => inspector.toggle_explode(),
        RemoteCommand::Scroll { delta } => inspector.on_scroll(delta),
        RemoteCommand::JumpToContext { index } => inspector.jump_to_context(index.max(0) as usize),
        RemoteCommand::SetWipeDirection { direction } => inspector.set_wipe_direction(direction)?,
        RemoteCommand::PointerMove { x, y } => {
            inspector.on_pointer_move(x, y);
        }
        RemoteCommand::Click { x, y } => {
            let outcome = inspector.on_click(x, y);
            log::info!("Remote click at ({}, {}): {:?}", x, y, outcome);
        }
        RemoteCommand::ToggleHotspot { index } => {
            if !inspector.toggle_hotspot(index) {
                log::warn!("No hotspot at index {}", index);
            }
        }
        RemoteCommand::LoadModel { key } => inspector.request_model(key)?,
        RemoteCommand::GetState | RemoteCommand::Ping => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpStream;
    use std::time::Duration;
    use crate::core::camera::ProjectionMode;
    use crate::inspector::InspectorConfig;
    use crate::scene::SceneDescription;

    fn inspector() -> Inspector {
        let mut inspector = Inspector::new(InspectorConfig::default(), None).unwrap();
        inspector.install_model("demo", SceneDescription::demo().unwrap().build());
        inspector
    }

    fn request(stream: &mut TcpStream, line: &str) -> serde_json::Value {
        writeln!(stream, "{}", line).unwrap();
        let mut reply = String::new();
        BufReader::new(stream.try_clone().unwrap()).read_line(&mut reply).unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[test]
    fn test_bridge_applies_and_publishes() {
        let mut bridge = RemoteBridge::start(ServerConfig {
            port: 0,
            max_connections: 1,
        })
        .unwrap();
        let mut stream = TcpStream::connect(bridge.local_addr()).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

        assert_eq!(request(&mut stream, r#"{"cmd":"ToggleZoom"}"#)["status"], "ok");

        let mut inspector = inspector();
        bridge.apply_pending(&mut inspector);
        assert!(inspector.camera().zoomed());
        bridge.publish(&inspector);

        let state = request(&mut stream, r#"{"cmd":"GetState"}"#);
        assert_eq!(state["data"]["camera"]["zoomed"], true);
        assert_eq!(state["data"]["model"], "demo");
    }

    #[test]
    fn test_apply_commands() {
        let mut inspector = inspector();
        let persp = RemoteCommand::SetProjection { mode: "persp".into() };
        apply_command(&mut inspector, persp).unwrap();
        assert_eq!(inspector.camera().mode(), ProjectionMode::Perspective);
        apply_command(&mut inspector, RemoteCommand::JumpToContext { index: -3 }).unwrap();
        assert_eq!(inspector.transition().position(), 0.0);
        apply_command(&mut inspector, RemoteCommand::SetView { name: "Rear".into() }).unwrap();
        assert_eq!(inspector.camera().view_name(), "Rear");
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut inspector = inspector();
        let rejected = [
            RemoteCommand::SetView { name: "Top".into() },
            RemoteCommand::SetWipeDirection { direction: 9 },
            RemoteCommand::SetProjection { mode: "fisheye".into() },
            RemoteCommand::LoadModel { key: "demo".into() },
        ];
        for cmd in rejected {
            assert!(apply_command(&mut inspector, cmd.clone()).is_err(), "{:?}", cmd);
        }
    }
}
