/// Wall validity predicate
pub mod criteria;
/// Open and closed lists with the best wall snapshot
pub mod frontier;
/// Step-driven wall synthesizer and its run state machine
pub mod synthesizer;
