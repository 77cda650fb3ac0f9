use serde::{Deserialize, Serialize};

/// Peak-hour data for one doctor in one month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HighDemandMonth {
    #[serde(default)]
    pub rows: Vec<PeakRow>,
    #[serde(default)]
    pub summary: BaselineSummary,
}

impl HighDemandMonth {
    pub fn hours(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.hour).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeakRow {
    pub hour: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSummary {
    #[serde(default)]
    pub total_slots: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSetup {
    pub doctor_name: String,
    pub year: i32,
    pub month: u32,
    pub hours: Vec<u32>,
}
