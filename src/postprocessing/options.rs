use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Integer that does not name any post-processing option
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown post-processing option id {0}")]
pub struct UnknownOptionId(pub u8);

/// Named post-processing stages.
///
/// The discriminants are persisted in result manifests and configuration
/// files. They must never be renumbered; new stages get new numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PostProcessingOption {
    PlotLine = 1,
    PlotCarpet = 2,
    PlotSankey = 3,
    PlotSingleDays = 4,
    PlotMonthlyBarCharts = 5,
    OpenDirectoryInExplorer = 6,
    ExportToCsv = 7,
    MakeNetworkCharts = 8,
    GeneratePdfReport = 9,
    WriteComponentsToReport = 10,
    WriteAllOutputsToReport = 11,
    WriteNetworkChartsToReport = 12,
    PlotSpecialTestingSingleDay = 13,
    GenerateCsvForHousingDataBase = 14,
    IncludeConfigsInPdfReport = 15,
    IncludeImagesInPdfReport = 16,
    ProvideDetailedIterationLogging = 17,
    ComputeOpex = 18,
    ComputeCapex = 19,
    ComputeKpisAndWriteToReport = 20,
    PrepareOutputsForScenarioEvaluation = 21,
    MakeResultJsonForWebtool = 22,
    WriteComponentConfigsToJson = 23,
    WriteKpisToJsonForBuildingSizer = 24,
    WriteKpisToJson = 25,
    WriteAllKpisToJson = 26,
    MakeOperationResultsForWebtool = 27,
}

use PostProcessingOption::*;

impl PostProcessingOption {
    /// Every option in discriminant order
    pub const ALL: [PostProcessingOption; 27] = [
        PlotLine,
        PlotCarpet,
        PlotSankey,
        PlotSingleDays,
        PlotMonthlyBarCharts,
        OpenDirectoryInExplorer,
        ExportToCsv,
        MakeNetworkCharts,
        GeneratePdfReport,
        WriteComponentsToReport,
        WriteAllOutputsToReport,
        WriteNetworkChartsToReport,
        PlotSpecialTestingSingleDay,
        GenerateCsvForHousingDataBase,
        IncludeConfigsInPdfReport,
        IncludeImagesInPdfReport,
        ProvideDetailedIterationLogging,
        ComputeOpex,
        ComputeCapex,
        ComputeKpisAndWriteToReport,
        PrepareOutputsForScenarioEvaluation,
        MakeResultJsonForWebtool,
        WriteComponentConfigsToJson,
        WriteKpisToJsonForBuildingSizer,
        WriteKpisToJson,
        WriteAllKpisToJson,
        MakeOperationResultsForWebtool,
    ];

    /// Stable integer identifier
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.id() == id)
    }

    /// Stages that must also be enabled for this one to run.
    ///
    /// A missing prerequisite is reported, never enabled behind the caller's back.
    pub fn prerequisites(self) -> &'static [PostProcessingOption] {
        match self {
            GeneratePdfReport => &[ExportToCsv],
            WriteComponentsToReport
            | WriteAllOutputsToReport
            | IncludeConfigsInPdfReport
            | IncludeImagesInPdfReport
            | ComputeKpisAndWriteToReport => &[GeneratePdfReport],
            WriteNetworkChartsToReport => &[GeneratePdfReport, MakeNetworkCharts],
            WriteKpisToJsonForBuildingSizer => &[WriteKpisToJson],
            _ => &[],
        }
    }

    /// Stages whose artifacts this one uses when they are enabled.
    ///
    /// These only order the dispatch; they are not required.
    pub fn consumes(self) -> &'static [PostProcessingOption] {
        match self {
            GeneratePdfReport => &[
                PlotLine,
                PlotCarpet,
                PlotSankey,
                PlotSingleDays,
                PlotMonthlyBarCharts,
                MakeNetworkCharts,
                PlotSpecialTestingSingleDay,
            ],
            _ => &[],
        }
    }

    /// The stage that honours this option, for options that only change
    /// what another stage writes
    pub fn applied_by(self) -> Option<PostProcessingOption> {
        match self {
            WriteComponentsToReport
            | WriteAllOutputsToReport
            | WriteNetworkChartsToReport
            | IncludeConfigsInPdfReport
            | IncludeImagesInPdfReport
            | ComputeKpisAndWriteToReport => Some(GeneratePdfReport),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PostProcessingOption {
    type Error = UnknownOptionId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(UnknownOptionId(id))
    }
}

impl From<PostProcessingOption> for u8 {
    fn from(option: PostProcessingOption) -> Self {
        option.id()
    }
}

impl std::fmt::Display for PostProcessingOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.id())
    }
}

/// The subset of stages selected for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostProcessingOptions(BTreeSet<PostProcessingOption>);

impl PostProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stage selected
    pub fn all() -> Self {
        PostProcessingOption::ALL.into_iter().collect()
    }

    /// Parse persisted integer identifiers
    pub fn from_ids(ids: &[u8]) -> Result<Self, UnknownOptionId> {
        ids.iter()
            .map(|&id| PostProcessingOption::try_from(id))
            .collect()
    }

    pub fn enable(&mut self, option: PostProcessingOption) -> &mut Self {
        self.0.insert(option);
        self
    }

    pub fn disable(&mut self, option: PostProcessingOption) -> &mut Self {
        self.0.remove(&option);
        self
    }

    pub fn is_enabled(&self, option: PostProcessingOption) -> bool {
        self.0.contains(&option)
    }

    /// Enabled options in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = PostProcessingOption> + '_ {
        self.0.iter().copied()
    }

    pub fn ids(&self) -> Vec<u8> {
        self.iter().map(PostProcessingOption::id).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prerequisites of `option` that are not enabled
    pub fn missing_prerequisites(&self, option: PostProcessingOption) -> Vec<PostProcessingOption> {
        option
            .prerequisites()
            .iter()
            .copied()
            .filter(|prerequisite| !self.is_enabled(*prerequisite))
            .collect()
    }
}

impl FromIterator<PostProcessingOption> for PostProcessingOptions {
    fn from_iter<I: IntoIterator<Item = PostProcessingOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
