// ABOUTME: Static catalog of the script blocks embedded in Glowroot trace reports.
// ABOUTME: Maps each output short name to the script element id used in the HTML.

/// One script block of interest in a trace report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTarget {
    /// Key used in the extracted output, e.g. `shared_query_texts`.
    pub short_name: &'static str,
    /// Value of the script element's `id` attribute, e.g. `sharedQueryTextsJson`.
    pub tag_id: &'static str,
}

/// All targets, in output order.
pub static TARGETS: [ExtractionTarget; 6] = [
    ExtractionTarget {
        short_name: "header",
        tag_id: "headerJson",
    },
    ExtractionTarget {
        short_name: "entries",
        tag_id: "entriesJson",
    },
    ExtractionTarget {
        short_name: "queries",
        tag_id: "queriesJson",
    },
    ExtractionTarget {
        short_name: "shared_query_texts",
        tag_id: "sharedQueryTextsJson",
    },
    ExtractionTarget {
        short_name: "main_thread_profile",
        tag_id: "mainThreadProfileJson",
    },
    ExtractionTarget {
        short_name: "aux_thread_profile",
        tag_id: "auxThreadProfileJson",
    },
];
