//! Property-based tests for depth resolution and the merge filters.
//!
//! These tests use proptest to generate random include graphs and line
//! streams and verify that ordering and filtering invariants hold for all of
//! them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashMap;

    use crate::phases::merge::{self, collapse_blank_runs, dedup_directives, MergeOptions};
    use crate::phases::{depth, graph};
    use crate::resolve::IncludeResolver;
    use crate::source::SourceUnit;
    use proptest::prelude::*;
    use proptest::sample::Index;

    /// A random acyclic include graph, as (file name, included names), in a
    /// random input order. Node `i` may only include nodes `j < i`.
    fn dag() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
        (1usize..14)
            .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), n))
            .prop_map(|picks| {
                picks
                    .into_iter()
                    .enumerate()
                    .map(|(i, deps)| {
                        let deps = if i == 0 {
                            Vec::new()
                        } else {
                            deps.iter().map(|d| format!("u{}.h", d.index(i))).collect()
                        };
                        (format!("u{i}.h"), deps)
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }

    fn units(nodes: &[(String, Vec<String>)]) -> Vec<SourceUnit> {
        nodes
            .iter()
            .map(|(name, deps)| {
                let mut text: String = deps
                    .iter()
                    .map(|d| format!("#include \"{d}\"\n"))
                    .collect();
                text.push_str("#include <vector>\n");
                text.push_str(&format!("int {};\n", name.replace('.', "_")));
                SourceUnit::from_text(name.as_str(), &text)
            })
            .collect()
    }

    fn lines() -> impl Strategy<Value = Vec<String>> {
        let choices = vec![
            "#include <a.h>",
            "#include \"a.h\"",
            "  #include <b.h>",
            "#include \"c/d.h\"",
            "",
            "   ",
            "int x;",
            "#pragma once",
        ];
        prop::collection::vec(prop::sample::select(choices), 0..40)
            .prop_map(|v| v.into_iter().map(String::from).collect())
    }

    // ============================================================================
    // Ordering properties
    // ============================================================================

    proptest! {
        /// Property: every unit comes after all of the units it includes
        #[test]
        fn dependencies_precede_dependents(nodes in dag()) {
            let units = units(&nodes);
            let resolver = IncludeResolver::empty();
            let graph = graph::execute(&units, &resolver);
            let depths = depth::execute(&graph).unwrap();
            let sorted = merge::sort_units(units, &depths);

            let position: HashMap<&str, usize> = sorted
                .iter()
                .enumerate()
                .map(|(i, u)| (u.key.as_str(), i))
                .collect();
            for (name, deps) in &nodes {
                for dep in deps {
                    prop_assert!(
                        position[dep.as_str()] < position[name.as_str()],
                        "{} should precede {}",
                        dep,
                        name
                    );
                }
            }
        }

        /// Property: units of equal depth keep their input order
        #[test]
        fn equal_depths_keep_input_order(nodes in dag()) {
            let units = units(&nodes);
            let input_order: Vec<String> = units.iter().map(|u| u.key.clone()).collect();
            let resolver = IncludeResolver::empty();
            let depths = depth::execute(&graph::execute(&units, &resolver)).unwrap();
            let sorted = merge::sort_units(units, &depths);

            for d in 0..nodes.len() {
                let expected: Vec<&String> = input_order
                    .iter()
                    .filter(|k| depths.get(k) == Some(d))
                    .collect();
                let actual: Vec<&String> = sorted
                    .iter()
                    .map(|u| &u.key)
                    .filter(|k| depths.get(k) == Some(d))
                    .collect();
                prop_assert_eq!(expected, actual);
            }
        }

        /// Property: merging the same inputs twice gives the same text
        #[test]
        fn merge_is_deterministic(nodes in dag()) {
            let render = || {
                let units = units(&nodes);
                let resolver = IncludeResolver::empty();
                let depths = depth::execute(&graph::execute(&units, &resolver)).unwrap();
                merge::execute(units, &depths, &resolver, &MergeOptions::default()).render()
            };
            prop_assert_eq!(render(), render());
        }

        /// Property: the external header survives exactly once, local ones never
        #[test]
        fn merged_output_has_no_local_includes(nodes in dag()) {
            let units = units(&nodes);
            let resolver = IncludeResolver::empty();
            let depths = depth::execute(&graph::execute(&units, &resolver)).unwrap();
            let doc = merge::execute(units, &depths, &resolver, &MergeOptions::default());

            prop_assert_eq!(
                doc.lines.iter().filter(|l| *l == "#include <vector>").count(),
                1
            );
            prop_assert!(!doc.lines.iter().any(|l| l.starts_with("#include \"")));
        }

        /// Property: closing a chain back onto its start is always rejected
        #[test]
        fn closed_chain_is_a_cycle(n in 1usize..30) {
            let nodes: Vec<(String, Vec<String>)> = (0..n)
                .map(|i| (format!("u{i}.h"), vec![format!("u{}.h", (i + 1) % n)]))
                .collect();
            let units = units(&nodes);
            let graph = graph::execute(&units, &IncludeResolver::empty());
            prop_assert!(depth::execute(&graph).is_err());
        }
    }

    // ============================================================================
    // Filter properties
    // ============================================================================

    proptest! {
        /// Property: deduplication is idempotent
        #[test]
        fn dedup_is_idempotent(input in lines()) {
            let once = dedup_directives(input);
            let twice = dedup_directives(once.clone());
            prop_assert_eq!(once, twice);
        }

        /// Property: blank-run collapsing is idempotent and leaves no adjacent blanks
        #[test]
        fn blank_collapse_is_idempotent(input in lines()) {
            let once = collapse_blank_runs(input);
            let twice = collapse_blank_runs(once.clone());
            prop_assert_eq!(&once, &twice);
            for pair in once.windows(2) {
                prop_assert!(!(pair[0].trim().is_empty() && pair[1].trim().is_empty()));
            }
        }

        /// Property: deduplication only ever removes lines
        #[test]
        fn dedup_keeps_non_directives(input in lines()) {
            let kept = dedup_directives(input.clone());
            let count = |v: &[String]| v.iter().filter(|l| !l.contains("#include")).count();
            prop_assert_eq!(count(&input), count(&kept));
            prop_assert!(kept.len() <= input.len());
        }
    }
}
