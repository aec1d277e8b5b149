//! Intent taxonomy
//!
//! The closed set of intents the classifier can emit. Pattern files refer to
//! intents by their wire tag (`GREETING`, `FOLLOW_UP_QUESTION`, ...), and a
//! tag missing from this list fails deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Taxonomy section an intent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Basic,
    Location,
    Category,
    Comparison,
    Temporal,
    Crisis,
    Environmental,
    Policy,
    Technical,
    Agriculture,
    Urban,
    Socioeconomic,
    Alerts,
    DataExport,
    Accessibility,
    Analytics,
    Integration,
    Conversational,
}

macro_rules! intent_taxonomy {
    ($( $category:ident { $( $variant:ident => $tag:literal ),+ $(,)? } )+) => {
        /// User intent
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Intent {
            #[default]
            $( $( $variant, )+ )+
        }

        impl Intent {
            /// Every intent, in taxonomy order
            pub const ALL: &'static [Intent] = &[ $( $( Intent::$variant, )+ )+ ];

            /// Wire tag, identical to the serde representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $( Intent::$variant => $tag, )+ )+
                }
            }

            pub fn category(&self) -> IntentCategory {
                match self {
                    $( $( Intent::$variant => IntentCategory::$category, )+ )+
                }
            }
        }
    };
}

intent_taxonomy! {
    Basic {
        Unknown => "UNKNOWN",
        Greeting => "GREETING",
        Goodbye => "GOODBYE",
        Help => "HELP",
        Status => "STATUS",
        Error => "ERROR",
    }
    Location {
        QueryLocation => "QUERY_LOCATION",
        QueryDistrict => "QUERY_DISTRICT",
        QueryBlock => "QUERY_BLOCK",
        QueryMultipleLocations => "QUERY_MULTIPLE_LOCATIONS",
        QueryNearby => "QUERY_NEARBY",
        QueryCoordinates => "QUERY_COORDINATES",
    }
    Category {
        QueryCategory => "QUERY_CATEGORY",
        CriticalAreas => "CRITICAL_AREAS",
        SafeAreas => "SAFE_AREAS",
        SemiCriticalAreas => "SEMI_CRITICAL_AREAS",
        OverExploitedAreas => "OVER_EXPLOITED_AREAS",
        CategoryExplanation => "CATEGORY_EXPLANATION",
        ClassificationCriteria => "CLASSIFICATION_CRITERIA",
    }
    Comparison {
        CompareLocations => "COMPARE_LOCATIONS",
        CompareCategories => "COMPARE_CATEGORIES",
        CompareYears => "COMPARE_YEARS",
        RankLocations => "RANK_LOCATIONS",
        BestWorstAreas => "BEST_WORST_AREAS",
    }
    Temporal {
        HistoricalTrend => "HISTORICAL_TREND",
        YearlyComparison => "YEARLY_COMPARISON",
        SeasonalAnalysis => "SEASONAL_ANALYSIS",
        FuturePrediction => "FUTURE_PREDICTION",
        RateOfChange => "RATE_OF_CHANGE",
    }
    Crisis {
        WaterCrisis => "WATER_CRISIS",
        EmergencyAreas => "EMERGENCY_AREAS",
        DroughtImpact => "DROUGHT_IMPACT",
        FloodImpact => "FLOOD_IMPACT",
        ClimateImpact => "CLIMATE_IMPACT",
    }
    Environmental {
        RainfallCorrelation => "RAINFALL_CORRELATION",
        MonsoonAnalysis => "MONSOON_ANALYSIS",
        TemperatureImpact => "TEMPERATURE_IMPACT",
        SoilTypeAnalysis => "SOIL_TYPE_ANALYSIS",
        GeologyImpact => "GEOLOGY_IMPACT",
    }
    Policy {
        PolicySuggestion => "POLICY_SUGGESTION",
        ConservationMethods => "CONSERVATION_METHODS",
        RechargeMethods => "RECHARGE_METHODS",
        RegulationInfo => "REGULATION_INFO",
        GovernmentSchemes => "GOVERNMENT_SCHEMES",
        SuccessStories => "SUCCESS_STORIES",
    }
    Technical {
        TechnicalExplanation => "TECHNICAL_EXPLANATION",
        CalculationMethod => "CALCULATION_METHOD",
        DataSource => "DATA_SOURCE",
        Methodology => "METHODOLOGY",
        UnitsExplanation => "UNITS_EXPLANATION",
    }
    Agriculture {
        AgricultureImpact => "AGRICULTURE_IMPACT",
        CropRecommendations => "CROP_RECOMMENDATIONS",
        IndustrialImpact => "INDUSTRIAL_IMPACT",
        IrrigationAnalysis => "IRRIGATION_ANALYSIS",
        FarmingPractices => "FARMING_PRACTICES",
    }
    Urban {
        UrbanGroundwater => "URBAN_GROUNDWATER",
        CityWaterStatus => "CITY_WATER_STATUS",
        InfrastructureNeeds => "INFRASTRUCTURE_NEEDS",
        PopulationImpact => "POPULATION_IMPACT",
    }
    Socioeconomic {
        EconomicImpact => "ECONOMIC_IMPACT",
        SocialImpact => "SOCIAL_IMPACT",
        LivelihoodImpact => "LIVELIHOOD_IMPACT",
        MigrationAnalysis => "MIGRATION_ANALYSIS",
    }
    Alerts {
        AlertSetup => "ALERT_SETUP",
        ThresholdMonitoring => "THRESHOLD_MONITORING",
        EarlyWarning => "EARLY_WARNING",
    }
    DataExport {
        ExportData => "EXPORT_DATA",
        GenerateReport => "GENERATE_REPORT",
        SummaryStatistics => "SUMMARY_STATISTICS",
        VisualizationRequest => "VISUALIZATION_REQUEST",
    }
    Accessibility {
        LanguageChange => "LANGUAGE_CHANGE",
        VoiceQuery => "VOICE_QUERY",
        AccessibilityHelp => "ACCESSIBILITY_HELP",
    }
    Analytics {
        CorrelationAnalysis => "CORRELATION_ANALYSIS",
        StatisticalAnalysis => "STATISTICAL_ANALYSIS",
        MachineLearningInsights => "MACHINE_LEARNING_INSIGHTS",
        AnomalyDetection => "ANOMALY_DETECTION",
    }
    Integration {
        ApiQuery => "API_QUERY",
        DataIntegration => "DATA_INTEGRATION",
        RealTimeData => "REAL_TIME_DATA",
    }
    Conversational {
        FollowUpQuestion => "FOLLOW_UP_QUESTION",
        ClarificationRequest => "CLARIFICATION_REQUEST",
        PreviousContext => "PREVIOUS_CONTEXT",
        ConversationSummary => "CONVERSATION_SUMMARY",
    }
}

impl Intent {
    /// Meta-intents that refer back to earlier turns
    pub fn is_conversational(&self) -> bool {
        self.category() == IntentCategory::Conversational
    }

    /// `UNKNOWN` and `ERROR` carry no actionable request
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Intent::Unknown | Intent::Error)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| Error::UnknownIntent(tag.to_string()))
    }
}
