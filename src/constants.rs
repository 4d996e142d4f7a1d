use ratatui::style::Color;

pub const PALETTE: Palette = Palette {
    header_bg: Color::Rgb(63, 63, 70),
    header_fg: Color::White,
    expanded_bg: Color::Rgb(229, 231, 235),
    detail_bg: Color::Rgb(212, 212, 216),
    detail_alt_bg: Color::Rgb(244, 244, 245),
    cursor_bg: Color::Rgb(0, 153, 255),
    badge_bg: Color::Rgb(9, 9, 11),
    accent: Color::Rgb(0, 176, 80),
};

pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    poll_ms: 16,
    target_fps: 30,
};

pub const COLUMNS: ColumnSettings = ColumnSettings {
    group_key: "formula_id",
    search_fields: &["formula_name", "notes"],
    filter_column: "category",
};

pub const FILE_PATHS: FilePaths = FilePaths {
    local_dataset: "./data/formulas.csv",
    dataset_file: "formulas.csv",
    log_file: "formulary.log",
};

pub const LOG_ENV_VAR: &str = "FORMULARY_LOG";

pub const TABLE_TITLE: &str = "Fragrance Table";

pub struct Palette {
    pub header_bg: Color,
    pub header_fg: Color,
    pub expanded_bg: Color,
    pub detail_bg: Color,
    pub detail_alt_bg: Color,
    pub cursor_bg: Color,
    pub badge_bg: Color,
    pub accent: Color,
}

pub struct TimeSettings {
    pub poll_ms: u64,
    pub target_fps: u64,
}

pub struct ColumnSettings {
    pub group_key: &'static str,
    pub search_fields: &'static [&'static str],
    pub filter_column: &'static str,
}

pub struct FilePaths {
    pub local_dataset: &'static str,
    pub dataset_file: &'static str,
    pub log_file: &'static str,
}
