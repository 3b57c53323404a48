//! Property tests for queue ordering.

mod common;

use common::{completions, drawn_indices, new_log, spied_drawable, Event, Spy};
use proptest::prelude::*;
use sketch_core::{BatchHost, Hsv, RunOptions};

proptest! {
    #[test]
    fn prop_draws_follow_enqueue_order(
        hues in prop::collection::vec(0.0f64..360.0, 0..40),
        seed in 1u32..=1_048_576,
    ) {
        let log = new_log();
        let mut d = spied_drawable(&log);
        let options = RunOptions::pixels(8, 8).with_seed(seed);
        d.init(&options).expect("init");
        for (index, hue) in hues.iter().enumerate() {
            d.enqueue(Spy { index, log: log.clone() }, Hsv::new(*hue, 60.0, 60.0))
                .expect("enqueue");
        }
        BatchHost::new().execute(&mut d, &options).expect("run");

        let expected: Vec<usize> = (0..hues.len()).collect();
        prop_assert_eq!(drawn_indices(&log), expected);
        prop_assert_eq!(completions(&log), 1);

        let colours: Vec<f64> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Drew { colour, .. } => Some(colour.h),
                Event::Done => None,
            })
            .collect();
        prop_assert_eq!(colours, hues);
    }
}
