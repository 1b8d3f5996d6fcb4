/// Static description of a sidebar destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelInfo {
    pub title: &'static str,
    /// One-line header shown under the panel title
    pub subtitle: &'static str,
    /// Longer text for the welcome screen cards
    pub description: &'static str,
}

pub const CONNECTION: PanelInfo = PanelInfo {
    title: "Connection",
    subtitle: "Configure the UDP telemetry listener",
    description: "Establish UDP connections to racing simulators and configure packet formats for real-time data streaming.",
};

pub const AUDIO: PanelInfo = PanelInfo {
    title: "Audio",
    subtitle: "Configure audio input/output settings",
    description: "Pick input and output devices and set their volume for voice capture.",
};

/// Telemetry categories in sidebar order. Titles match the category names the
/// host tags rows with.
pub const TELEMETRY: &[PanelInfo] = &[
    PanelInfo {
        title: "Motion Data",
        subtitle: "Real-time physics data for all vehicles in the session",
        description: "View detailed physics data for all cars being driven in the current session.",
    },
    PanelInfo {
        title: "Session Data",
        subtitle: "Weather conditions, track information, and session details",
        description: "View comprehensive session information including marshal zones, weather conditions, and track statistics.",
    },
    PanelInfo {
        title: "Lap Data",
        subtitle: "Detailed lap times, sector data, and driver status",
        description: "Detailed lap-by-lap analysis for all vehicles including sector times, driver status, and penalties.",
    },
    PanelInfo {
        title: "Events",
        subtitle: "Session events, incidents, and race flags",
        description: "Events and incidents that happen during the course of a session.",
    },
    PanelInfo {
        title: "Car Setups",
        subtitle: "Aerodynamic, suspension, and brake configurations",
        description: "Car setups of each vehicle in the session including aerodynamics, tyres, and brakes.",
    },
    PanelInfo {
        title: "Car Telemetry",
        subtitle: "Live vehicle data including speed, RPM, and temperatures",
        description: "Monitor real-time vehicle data including speed, RPM, and engine performance metrics.",
    },
    PanelInfo {
        title: "Car Status",
        subtitle: "Fuel levels, DRS status, and traction control settings",
        description: "Check the status of indicators like traction control, brake bias, and fuel capacity.",
    },
    PanelInfo {
        title: "Car Damage",
        subtitle: "Component wear, damage levels, and fault indicators",
        description: "Monitor every vehicle's damage levels, component wear, and faults throughout the session.",
    },
    PanelInfo {
        title: "Participants",
        subtitle: "Driver information and participant details",
        description: "View driver information and participant details for the current session.",
    },
    PanelInfo {
        title: "Lobby Info",
        subtitle: "Multiplayer lobby settings and player status",
        description: "View details of players in a multiplayer lobby like their selected car or ready status.",
    },
    PanelInfo {
        title: "Final Classification",
        subtitle: "Race results, standings, and final lap times",
        description: "View final race results, driver standings, and best lap times after the session.",
    },
    PanelInfo {
        title: "Session History",
        subtitle: "Historical lap data and tire usage information",
        description: "Browse historic lap times and tyre usage for the session.",
    },
];

const FALLBACK_SUBTITLE: &str = "View and manage telemetry data";

pub fn telemetry_info(category: &str) -> Option<&'static PanelInfo> {
    TELEMETRY.iter().find(|p| p.title == category)
}

pub fn subtitle_for(category: &str) -> &'static str {
    telemetry_info(category).map_or(FALLBACK_SUBTITLE, |p| p.subtitle)
}

/// Everything the welcome screen may feature as a card.
pub fn card_candidates() -> Vec<&'static PanelInfo> {
    std::iter::once(&CONNECTION).chain(TELEMETRY.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_lookup() {
        assert_eq!(
            subtitle_for("Events"),
            "Session events, incidents, and race flags"
        );
        assert_eq!(subtitle_for("Unknown"), FALLBACK_SUBTITLE);
    }

    #[test]
    fn test_card_candidates_include_connection() {
        let cards = card_candidates();
        assert_eq!(cards.len(), TELEMETRY.len() + 1);
        assert_eq!(cards[0].title, "Connection");
    }
}
