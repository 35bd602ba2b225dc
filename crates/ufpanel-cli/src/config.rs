//! Input layout and per-source reading rules.

use std::path::{Path, PathBuf};

use ufpanel_ingest::{NormalizeOptions, ReadOptions, WideTableOptions};

/// Output column of the suicide series (the panel seed).
pub const SUICIDE_COLUMN: &str = "suicidios";
/// Output column of the domestic-violence series.
pub const DOMESTIC_COLUMN: &str = "violencia_domestica";
/// Output column of the population series.
pub const POPULATION_COLUMN: &str = "populacao";
/// Output column of the GDP series.
pub const GDP_COLUMN: &str = "pib_estado";
/// Output column of the welfare beneficiaries series.
pub const WELFARE_COLUMN: &str = "bolsa_familia_beneficiados";

/// Year removed from the final panel.
pub const DROPPED_YEAR: i32 = 2015;
/// Year column taken from the census supplement.
pub const CENSUS_YEAR: &str = "2010";

const DOMESTIC_SKIP_LINES: usize = 5;
const SUICIDE_SKIP_LINES: usize = 4;
const SUICIDE_EXCLUDED_YEARS: [i32; 2] = [2022, 2023];
const EXTRA_SKIP_LINES: usize = 4;
const EXTRA_EXCLUDED_YEARS: [i32; 3] = [2022, 2023, 2024];

/// Where every input lives and where outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Domestic-violence exports, one or more CSV files (searched recursively).
    pub domestic_root: PathBuf,
    pub suicide_file: PathBuf,
    pub population_file: PathBuf,
    /// Census figures that fill the population series' 2010 column.
    pub population_2010_file: PathBuf,
    pub gdp_file: PathBuf,
    pub welfare_file: PathBuf,
    /// Extra violence indicators, one CSV file per indicator.
    pub violence_root: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_base_dir(Path::new("."))
    }
}

impl PipelineConfig {
    /// The standard layout resolved against `base`.
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            domestic_root: base.join("domestica"),
            suicide_file: base
                .join("suicidio")
                .join("suicidios_2009-2023_UF_Original.csv"),
            population_file: base.join("ipeadata[27-05-2025-04-06]Pop-estimativa.csv"),
            population_2010_file: base.join("ipeadata[29-05-2025-07-43]_populacao_2010.csv"),
            gdp_file: base.join("ipeadata[27-05-2025-10-21]_pib_estado.csv"),
            welfare_file: base
                .join("ipeadata[27-05-2025-10-30]_bolsa_familia_numero_benficiados.csv"),
            violence_root: base.join("violencia"),
            output_dir: base.join("tratado"),
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn domestic_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(ReadOptions::latin1(DOMESTIC_SKIP_LINES))
    }

    pub fn suicide_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(ReadOptions::latin1(SUICIDE_SKIP_LINES))
            .excluding_years(SUICIDE_EXCLUDED_YEARS)
    }

    pub fn extra_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(ReadOptions::latin1(EXTRA_SKIP_LINES))
            .excluding_years(EXTRA_EXCLUDED_YEARS)
    }

    pub fn wide_options(&self) -> WideTableOptions {
        WideTableOptions::default()
    }
}
