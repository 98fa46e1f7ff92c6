// Per panel-type defaults: minimum size, default size, title and options.

use serde_json::{json, Map, Value};

use crate::{GridSize, COLUMNS};

pub const ROW_KIND: &str = "row";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDefaults {
    pub kind: &'static str,
    pub min_size: GridSize,
    pub default_size: GridSize,
    pub title: &'static str,
}

impl KindDefaults {
    /// Default options for a freshly created panel of this type.
    pub fn options(&self) -> Map<String, Value> {
        let value = match self.kind {
            "text" => json!({ "mode": "markdown", "content": "" }),
            "stat" => json!({ "reduceOptions": { "calcs": ["lastNotNull"] }, "colorMode": "value" }),
            "gauge" => json!({ "reduceOptions": { "calcs": ["lastNotNull"] }, "showThresholdMarkers": true }),
            "table" => json!({ "showHeader": true }),
            "timeseries" | "barchart" => json!({ "legend": { "displayMode": "list", "placement": "bottom" } }),
            "piechart" => json!({ "pieType": "pie", "legend": { "displayMode": "list" } }),
            "geomap" => json!({ "view": { "id": "zero", "zoom": 1 } }),
            _ => json!({}),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

const FALLBACK: KindDefaults = KindDefaults {
    kind: "",
    min_size: GridSize::new(2, 2),
    default_size: GridSize::new(8, 6),
    title: "Panel Title",
};

const TABLE: &[KindDefaults] = &[
    KindDefaults {
        kind: ROW_KIND,
        min_size: GridSize::new(COLUMNS, 1),
        default_size: GridSize::new(COLUMNS, 1),
        title: "Row title",
    },
    KindDefaults {
        kind: "stat",
        min_size: GridSize::new(2, 2),
        default_size: GridSize::new(6, 4),
        title: "Stat",
    },
    KindDefaults {
        kind: "gauge",
        min_size: GridSize::new(3, 3),
        default_size: GridSize::new(6, 6),
        title: "Gauge",
    },
    KindDefaults {
        kind: "text",
        min_size: GridSize::new(2, 1),
        default_size: GridSize::new(8, 3),
        title: "Text",
    },
    KindDefaults {
        kind: "table",
        min_size: GridSize::new(4, 3),
        default_size: GridSize::new(12, 8),
        title: "Table",
    },
    KindDefaults {
        kind: "timeseries",
        min_size: GridSize::new(4, 3),
        default_size: GridSize::new(12, 8),
        title: "Time series",
    },
    KindDefaults {
        kind: "barchart",
        min_size: GridSize::new(4, 3),
        default_size: GridSize::new(12, 8),
        title: "Bar chart",
    },
    KindDefaults {
        kind: "piechart",
        min_size: GridSize::new(4, 4),
        default_size: GridSize::new(8, 8),
        title: "Pie chart",
    },
    KindDefaults {
        kind: "geomap",
        min_size: GridSize::new(6, 4),
        default_size: GridSize::new(12, 10),
        title: "Map",
    },
];

/// Look up the defaults for a panel type. Unknown types get a generic entry.
pub fn kind_defaults(kind: &str) -> KindDefaults {
    TABLE
        .iter()
        .find(|entry| entry.kind == kind)
        .copied()
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kind_has_its_own_minimum() {
        assert_eq!(kind_defaults("table").min_size, GridSize::new(4, 3));
        assert_eq!(kind_defaults("row").default_size, GridSize::new(COLUMNS, 1));
    }

    #[test]
    fn unknown_kind_falls_back() {
        let defaults = kind_defaults("heatmap-3d");
        assert_eq!(defaults.min_size, FALLBACK.min_size);
        assert_eq!(defaults.title, "Panel Title");
        assert!(defaults.options().is_empty());
    }

    #[test]
    fn defaults_never_exceed_the_canvas() {
        for entry in TABLE {
            assert!(entry.min_size.w <= entry.default_size.w, "{}", entry.kind);
            assert!(entry.min_size.h <= entry.default_size.h, "{}", entry.kind);
            assert!(entry.default_size.w <= COLUMNS, "{}", entry.kind);
        }
    }
}
