//! Statically typed UI translations.
//!
//! Every label is a `Label` variant and every translation an arm of an
//! exhaustive match, so adding a label without translating it fails to
//! compile.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Hindi];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "hi" | "hindi" => Some(Language::Hindi),
            _ => None,
        }
    }

    /// Name of the language in itself, for the language picker.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::English => Language::Hindi,
            Language::Hindi => Language::English,
        }
    }
}

/// Fixed UI strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Title,
    Subtitle,
    Households,
    Expenditure,
    PersonDays,
    AvgWage,
    SelectState,
    SelectDistrict,
    FetchData,
    PerformanceSummary,
    NoData,
    CachedBanner,
    Trend,
    RegionComparison,
    RegionAverageUnavailable,
    YearOverYear,
    SeasonalPatterns,
    CompareDistricts,
    MonthlyData,
    Month,
    Year,
    Metric,
    Value,
    LatestMonth,
    ReportTitle,
    ReportGenerated,
    KeyMetrics,
    MonthlyTrend,
    DataSource,
    Disclaimer,
    ReportSaved,
    NotEnoughYears,
    FindDistrict,
    SuggestedDistricts,
    NoMatchingDistrict,
    Glossary,
    HouseholdsHelp,
    PersonDaysHelp,
    ExpenditureHelp,
    AvgWageHelp,
}

impl Label {
    pub fn text(&self, lang: Language) -> &'static str {
        match lang {
            Language::English => self.english(),
            Language::Hindi => self.hindi(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Label::Title => "Our Voice, Our Rights - MGNREGA Dashboard",
            Label::Subtitle => "Understand your district's performance under MGNREGA",
            Label::Households => "Households Worked",
            Label::Expenditure => "Total Expenditure",
            Label::PersonDays => "Person-Days Generated",
            Label::AvgWage => "Average Wage",
            Label::SelectState => "Select State",
            Label::SelectDistrict => "Select District",
            Label::FetchData => "Fetch Data",
            Label::PerformanceSummary => "Performance Summary",
            Label::NoData => "No data available for this district",
            Label::CachedBanner => "Showing cached data",
            Label::Trend => "6-Month Trend",
            Label::RegionComparison => "District vs State Average",
            Label::RegionAverageUnavailable => "State average data not available",
            Label::YearOverYear => "Year-over-Year Comparison",
            Label::SeasonalPatterns => "Seasonal Patterns",
            Label::CompareDistricts => "Compare Multiple Districts",
            Label::MonthlyData => "All Monthly Data",
            Label::Month => "Month",
            Label::Year => "Year",
            Label::Metric => "Metric",
            Label::Value => "Value",
            Label::LatestMonth => "Latest Month",
            Label::ReportTitle => "MGNREGA Performance Report",
            Label::ReportGenerated => "Report Generated",
            Label::KeyMetrics => "Key Metrics Summary",
            Label::MonthlyTrend => "Monthly Trend Data",
            Label::DataSource => "Data Source: Government of India Open Data Portal (data.gov.in)",
            Label::Disclaimer => "This report is generated for informational purposes only.",
            Label::ReportSaved => "Report saved",
            Label::NotEnoughYears => "At least two years of data are needed for comparison",
            Label::FindDistrict => "City, town or landmark",
            Label::SuggestedDistricts => "Suggested district(s)",
            Label::NoMatchingDistrict => "No matching district found",
            Label::Glossary => "Glossary",
            Label::HouseholdsHelp => "Families that got wage work this month",
            Label::PersonDaysHelp => "One person working one day",
            Label::ExpenditureHelp => "Wages plus material costs, in Lakh/Crore",
            Label::AvgWageHelp => "Average daily wage paid per worker",
        }
    }

    fn hindi(&self) -> &'static str {
        match self {
            Label::Title => "हमारी आवाज, हमारे अधिकार - मनरेगा डैशबोर्ड",
            Label::Subtitle => "मनरेगा के तहत अपने जिले के प्रदर्शन को समझें",
            Label::Households => "कुल परिवार",
            Label::Expenditure => "कुल व्यय",
            Label::PersonDays => "कार्य दिवस",
            Label::AvgWage => "औसत वेतन",
            Label::SelectState => "राज्य चुनें",
            Label::SelectDistrict => "जिला चुनें",
            Label::FetchData => "डेटा प्राप्त करें",
            Label::PerformanceSummary => "प्रदर्शन सारांश",
            Label::NoData => "इस जिले के लिए कोई डेटा उपलब्ध नहीं है",
            Label::CachedBanner => "कैश किया गया डेटा दिखाया जा रहा है",
            Label::Trend => "6 महीने का रुझान",
            Label::RegionComparison => "जिला बनाम राज्य औसत",
            Label::RegionAverageUnavailable => "राज्य औसत डेटा उपलब्ध नहीं है",
            Label::YearOverYear => "वर्ष-दर-वर्ष तुलना",
            Label::SeasonalPatterns => "मौसमी पैटर्न",
            Label::CompareDistricts => "कई जिलों की तुलना करें",
            Label::MonthlyData => "सभी मासिक डेटा",
            Label::Month => "महीना",
            Label::Year => "वर्ष",
            Label::Metric => "मैट्रिक",
            Label::Value => "मूल्य",
            Label::LatestMonth => "नवीनतम महीना",
            Label::ReportTitle => "मनरेगा प्रदर्शन रिपोर्ट",
            Label::ReportGenerated => "रिपोर्ट तैयार",
            Label::KeyMetrics => "मुख्य मैट्रिक्स सारांश",
            Label::MonthlyTrend => "मासिक रुझान डेटा",
            Label::DataSource => "डेटा स्रोत: भारत सरकार ओपन डेटा पोर्टल (data.gov.in)",
            Label::Disclaimer => "यह रिपोर्ट केवल सूचनात्मक उद्देश्यों के लिए तैयार की गई है।",
            Label::ReportSaved => "रिपोर्ट सहेजी गई",
            Label::NotEnoughYears => "तुलना के लिए कम से कम दो वर्षों का डेटा आवश्यक है",
            Label::FindDistrict => "शहर, कस्बा या स्थान",
            Label::SuggestedDistricts => "सुझाया गया जिला",
            Label::NoMatchingDistrict => "कोई मेल खाता जिला नहीं मिला",
            Label::Glossary => "शब्दावली",
            Label::HouseholdsHelp => "इस महीने मजदूरी रोजगार पाने वाले परिवार",
            Label::PersonDaysHelp => "एक व्यक्ति का एक दिन का काम",
            Label::ExpenditureHelp => "मजदूरी और सामग्री लागत, लाख/करोड़ में",
            Label::AvgWageHelp => "प्रति श्रमिक औसत दैनिक मजदूरी",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("HI"), Some(Language::Hindi));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Language::English.toggle(), Language::Hindi);
        assert_eq!(Language::Hindi.toggle(), Language::English);
    }

    #[test]
    fn test_translations_differ() {
        assert_eq!(Label::Households.text(Language::English), "Households Worked");
        assert_eq!(Label::Households.text(Language::Hindi), "कुल परिवार");
        assert_ne!(
            Label::NoData.text(Language::English),
            Label::NoData.text(Language::Hindi)
        );
    }

    #[test]
    fn test_language_serde() {
        assert_eq!(serde_json::to_string(&Language::Hindi).unwrap(), "\"hindi\"");
        let parsed: Language = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(parsed, Language::English);
    }
}
