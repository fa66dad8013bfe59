pub mod formatter;

pub use formatter::{
    dimension_bar, format_age, format_breakdown, format_json, format_proposal_list,
    format_ranking_table, format_ranking_tsv, format_score, format_score_result,
    should_use_colors, truncate_text,
};
