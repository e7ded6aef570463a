use probewire_core::{Channel, ChannelTemperature, Device, TelemetrySession};

fn channel(id: u64, channel: u32, label: &str, color_hex: &str) -> Channel {
    Channel {
        id,
        channel,
        channel_label: label.to_string(),
        color_hex: color_hex.to_string(),
        enabled: true,
        sessionid: Some(super::charts::RECORDED_SESSION_ID),
        created: None,
    }
}

fn temp(channel: u32, temp: f64) -> ChannelTemperature {
    ChannelTemperature {
        channel,
        temp,
        degreetype: 2,
        created: None,
    }
}

pub fn all() -> Vec<Device> {
    vec![smoker(), kitchen()]
}

pub fn by_uuid(uuid: &str) -> Option<Device> {
    all().into_iter().find(|d| d.uuid == uuid)
}

pub fn smoker() -> Device {
    Device {
        uuid: "a3c9e2f0-smoker".to_string(),
        id: 1001,
        title: "Backyard Smoker".to_string(),
        hardware_id: "FB2-00A1".to_string(),
        model: Some("FBX2".to_string()),
        channels: vec![
            channel(1, 1, "Pit", "#e53935"),
            channel(2, 2, "Brisket", "#1e88e5"),
            channel(3, 3, "Probe 3", "#43a047"),
        ],
        latest_temps: vec![temp(1, 225.4), temp(2, 161.8)],
        ..Device::default()
    }
}

pub fn kitchen() -> Device {
    Device {
        uuid: "b71d44aa-kitchen".to_string(),
        id: 1002,
        title: "Kitchen".to_string(),
        hardware_id: "FBM-0B22".to_string(),
        model: Some("FBM".to_string()),
        channels: vec![channel(4, 1, "Oven", "#8e24aa")],
        latest_temps: Vec::new(),
        ..Device::default()
    }
}

pub fn sessions() -> Vec<TelemetrySession> {
    vec![TelemetrySession {
        id: super::charts::RECORDED_SESSION_ID,
        title: "Sunday brisket".to_string(),
        description: "14 lb packer".to_string(),
        device_ids: vec![smoker().uuid],
        devices: vec![smoker()],
        ..TelemetrySession::default()
    }]
}
