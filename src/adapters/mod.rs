//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to                   |
//! |-----------------|--------------------|-------------------------------|
//! | `hardware`      | SensorPort         | Sense HAT IIO sysfs           |
//! |                 | ThermalPort        | vcgencmd, thermal zone        |
//! |                 | CameraPort         | libcamera-still               |
//! |                 | ClockPort          | system clock                  |
//! | `cloud`         | ObjectStorePort    | mounted bucket directory      |
//! |                 | RecordStorePort    | JSON-lines table              |
//! | `config_file`   | ConfigPort         | JSON file on disk             |
//! | `log_sink`      | EventSink          | `log` facade                  |
//! | `time`          | ClockPort          | `chrono::Utc::now`            |

pub mod cloud;
pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod object_store;
pub mod record_store;
pub mod time;
