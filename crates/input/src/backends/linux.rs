//! evdev backend: reads wheel, key, and button events from `/dev/input/event*`.

use std::collections::VecDeque;
use std::os::unix::fs::MetadataExt;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;

use evdev::{Device, InputEventKind, Key, RelativeAxisType};

use smoothwheel_common::clock::SessionClock;
use smoothwheel_common::error::{SmoothwheelError, SmoothwheelResult};
use smoothwheel_model::event::{Axis, ButtonState, InputEvent};

use crate::backends::StubBackend;
use crate::InputBackend;

/// First code of the `BTN_*` range; lower codes are keyboard keys.
const BTN_MISC: u16 = 0x100;

/// Kernel autorepeat value for held keys.
const KEY_REPEAT: i32 = 2;

/// Consecutive failed reads before a device is dropped.
const MAX_READ_FAILURES: u32 = 3;

struct OpenDevice {
    path: PathBuf,
    name: String,
    device: Device,
    failures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadError {
    /// Nothing queued on a non-blocking fd.
    Empty,
    /// The device node went away.
    Disconnected,
    Failed,
}

fn classify_read_error(err: &std::io::Error) -> ReadError {
    if err.kind() == std::io::ErrorKind::WouldBlock {
        ReadError::Empty
    } else if err.raw_os_error() == Some(libc::ENODEV) {
        ReadError::Disconnected
    } else {
        ReadError::Failed
    }
}

/// Count a failed read; returns true once the device should be dropped.
fn note_read_failure(failures: &mut u32) -> bool {
    *failures += 1;
    *failures >= MAX_READ_FAILURES
}

pub struct EvdevBackend {
    devices: Vec<OpenDevice>,
    pending: VecDeque<InputEvent>,
    clock: SessionClock,
}

impl EvdevBackend {
    /// Open every device that reports a wheel, keys, or mouse buttons.
    pub fn new(clock: SessionClock) -> SmoothwheelResult<Self> {
        let mut devices = Vec::new();
        for (path, device) in evdev::enumerate() {
            if !is_relevant(&device) {
                continue;
            }
            let name = device.name().unwrap_or("unnamed").to_string();
            if let Err(e) = set_nonblocking(&device) {
                tracing::warn!(device = %path.display(), error = %e, "Skipping device");
                continue;
            }
            tracing::debug!(device = %path.display(), name = %name, "Opened input device");
            devices.push(OpenDevice {
                path,
                name,
                device,
                failures: 0,
            });
        }

        if !devices.iter().any(|d| has_wheel(&d.device)) {
            return Err(SmoothwheelError::device(format!(
                "no readable wheel device under /dev/input ({})",
                permission_diagnostic()
            )));
        }

        Ok(Self {
            devices,
            pending: VecDeque::new(),
            clock,
        })
    }

    pub fn is_supported() -> bool {
        std::fs::read_dir("/dev/input")
            .map(|mut entries| {
                entries.any(|e| {
                    e.map(|e| e.file_name().to_string_lossy().starts_with("event"))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Names of the opened devices.
    pub fn device_names(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.name.as_str()).collect()
    }

    /// Drain every open device. A failing device never stops the others
    /// from being read.
    fn ingest(&mut self) {
        let now = self.clock.elapsed_ns();
        let mut lost = Vec::new();

        for (idx, open) in self.devices.iter_mut().enumerate() {
            match open.device.fetch_events() {
                Ok(events) => {
                    open.failures = 0;
                    for event in events {
                        if let Some(converted) = convert(now, event.kind(), event.value()) {
                            self.pending.push_back(converted);
                        }
                    }
                }
                Err(err) => match classify_read_error(&err) {
                    ReadError::Empty => {}
                    ReadError::Disconnected => {
                        tracing::warn!(device = %open.path.display(), "Input device disconnected");
                        lost.push(idx);
                    }
                    ReadError::Failed => {
                        tracing::warn!(
                            device = %open.path.display(),
                            error = %err,
                            attempt = open.failures + 1,
                            "Failed reading input device"
                        );
                        if note_read_failure(&mut open.failures) {
                            tracing::warn!(device = %open.path.display(), "Dropping failing input device");
                            lost.push(idx);
                        }
                    }
                },
            }
        }

        for idx in lost.into_iter().rev() {
            self.devices.remove(idx);
        }
    }
}

impl InputBackend for EvdevBackend {
    fn poll(&mut self) -> SmoothwheelResult<Option<InputEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest();
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        "evdev"
    }

    fn is_available(&self) -> bool {
        !self.devices.is_empty()
    }
}

/// Map one kernel event. Positive vertical deltas scroll content up.
fn convert(now: u64, kind: InputEventKind, value: i32) -> Option<InputEvent> {
    match kind {
        InputEventKind::RelAxis(RelativeAxisType::REL_WHEEL) if value != 0 => {
            Some(InputEvent::wheel(now, Axis::Vertical, value as f64))
        }
        InputEventKind::RelAxis(RelativeAxisType::REL_HWHEEL) if value != 0 => {
            Some(InputEvent::wheel(now, Axis::Horizontal, value as f64))
        }
        InputEventKind::Key(key) if value != KEY_REPEAT => {
            let state = if value == 0 {
                ButtonState::Up
            } else {
                ButtonState::Down
            };
            let code = key.code();
            if code < BTN_MISC {
                Some(InputEvent::key(now, code, state))
            } else {
                Some(InputEvent::button(now, code, state))
            }
        }
        _ => None,
    }
}

fn has_wheel(device: &Device) -> bool {
    device.supported_relative_axes().map_or(false, |axes| {
        axes.contains(RelativeAxisType::REL_WHEEL) || axes.contains(RelativeAxisType::REL_HWHEEL)
    })
}

fn is_relevant(device: &Device) -> bool {
    has_wheel(device)
        || device.supported_keys().map_or(false, |keys| {
            keys.contains(Key::KEY_LEFTCTRL) || keys.contains(Key::BTN_LEFT)
        })
}

fn set_nonblocking(device: &Device) -> std::io::Result<()> {
    let fd = device.as_raw_fd();
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Detect the best available input backend for the current system.
pub fn detect_best_backend(clock: SessionClock) -> Box<dyn InputBackend> {
    if EvdevBackend::is_supported() {
        match EvdevBackend::new(clock) {
            Ok(backend) => {
                tracing::info!(devices = ?backend.device_names(), "Using evdev backend");
                return Box::new(backend);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize evdev backend, using stub");
            }
        }
    }

    tracing::warn!(
        details = %permission_diagnostic(),
        "Using stub input backend; wheel events will not be captured"
    );
    Box::new(StubBackend::empty())
}

fn permission_diagnostic() -> String {
    let path = "/dev/input/event0";
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(path) {
        Ok(meta) => format!(
            "device={path} mode={:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}; likely missing 'input' group membership. Fix: sudo usermod -aG input $USER && log out/in",
            meta.mode() & 0o777,
            meta.uid(),
            meta.gid(),
        ),
        Err(err) => format!(
            "device={path} unavailable ({err}); ensure kernel input devices exist and permissions allow read access"
        ),
    }
}
