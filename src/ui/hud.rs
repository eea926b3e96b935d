use crate::world::WorldStats;

/// Energy readout shown in the screen corner, truncated to a whole percent
pub fn energy_label(energy: f32) -> String {
    format!("{}%", energy.max(0.0) as u32)
}

/// Heads-up display showing the avatar's energy and world status
#[derive(Debug, Clone)]
pub struct Hud {
    show: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Hud { show: true }
    }

    /// Toggle HUD visibility
    pub fn toggle(&mut self) {
        self.show = !self.show;
    }

    pub fn is_visible(&self) -> bool {
        self.show
    }

    /// Text for the energy corner, `None` while hidden
    pub fn energy_text(&self, energy: f32) -> Option<String> {
        self.show.then(|| energy_label(energy))
    }

    /// One-line status summary, `None` while hidden
    pub fn status_line(&self, stats: &WorldStats) -> Option<String> {
        if !self.show {
            return None;
        }
        let consumed = stats.fruit_consumed;
        Some(format!(
            "{} | phase {:.1}s | fruit {}/{} | jumps {}",
            energy_label(stats.energy),
            stats.phase,
            stats.fruit_available,
            stats.fruit_available + consumed,
            stats.jumps
        ))
    }
}
