// src/routes/mod.rs
pub mod feature;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Ask,
    Quiz,
    Summary,
    Countdown,
    StudyPlan,
    MindMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Fixed endpoint an intent is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
}

impl Route {
    /// Join against the backend base. An empty base keeps the path relative.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }
}

impl Intent {
    pub const FEATURES: [Intent; 5] = [
        Intent::Quiz,
        Intent::Summary,
        Intent::Countdown,
        Intent::StudyPlan,
        Intent::MindMap,
    ];

    pub fn route(self) -> Route {
        use Intent::*;

        match self {
            Ask => Route { method: Method::Post, path: "/ask" },
            Quiz => Route { method: Method::Post, path: "/quiz" },
            Summary => Route { method: Method::Post, path: "/summary" },
            Countdown => Route { method: Method::Get, path: "/countdown" },
            StudyPlan => Route { method: Method::Post, path: "/study_plan" },
            MindMap => Route { method: Method::Post, path: "/mindmap" },
        }
    }

    pub fn parse(name: &str) -> Option<Intent> {
        match name.trim().to_lowercase().as_str() {
            "ask" => Some(Intent::Ask),
            "quiz" => Some(Intent::Quiz),
            "summary" => Some(Intent::Summary),
            "countdown" => Some(Intent::Countdown),
            "plan" | "study_plan" => Some(Intent::StudyPlan),
            "mindmap" | "mind_map" => Some(Intent::MindMap),
            _ => None,
        }
    }
}
