use shard_config::{MergePolicy, OptionValue, ReconciledConfig, CATALOGUE};
use shard_topology::{RelevantShards, ShardDescriptor};
use std::collections::BTreeMap;
use tracing::info;

use crate::{LogLevelLookup, OptionChange, ReconcileError, Tolerance};

/// Result of folding all sibling declarations into the local config.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    pub config: ReconciledConfig,
    /// Every adopted value, in the order it was applied.
    pub changes: Vec<OptionChange>,
    /// Sibling descriptors as left after merging: absorbing options
    /// (the analysis list) are cleared so they are not counted twice.
    pub absorbed: Vec<ShardDescriptor>,
}

/// Fold every sibling's declared defaults into `local`.
///
/// Siblings are visited in ascending suffix order and `own_suffix` is
/// skipped. Options outside the catalogue are ignored. The first strict or
/// type violation aborts the fold; tolerant numerics are checked after all
/// siblings, across every declared value.
pub fn reconcile_options(
    local: &ReconciledConfig,
    shards: &RelevantShards<'_>,
    own_suffix: &str,
    levels: &dyn LogLevelLookup,
) -> Result<Reconciliation, ReconcileError> {
    let mut config = local.clone();
    let mut changes: Vec<OptionChange> = Vec::new();
    let mut absorbed: Vec<ShardDescriptor> = Vec::new();
    // Tolerant numerics are settled once every sibling has been seen.
    let mut numeric: BTreeMap<&str, Vec<NumericDeclaration<'_>>> = BTreeMap::new();

    for (suffix, sibling) in shards.iter() {
        if suffix == own_suffix {
            continue;
        }

        for declared in &sibling.declared_options {
            let Some(policy) = config.policy(&declared.name) else {
                continue;
            };
            if !policy.is_reconciled() {
                continue;
            }
            let expected = policy.expected_type();
            if declared.default_value.value_type() != expected {
                return Err(ReconcileError::TypeMismatch {
                    option: declared.name.clone(),
                    sibling: sibling.name.clone(),
                    expected,
                    found: declared.default_value.value_type(),
                });
            }

            if let (MergePolicy::TolerantNumeric, OptionValue::Number(value)) =
                (policy, &declared.default_value)
            {
                numeric
                    .entry(declared.name.as_str())
                    .or_default()
                    .push(NumericDeclaration {
                        value: *value,
                        sibling: sibling.name.as_str(),
                    });
                continue;
            }

            let current = config
                .value(&declared.name)
                .cloned()
                .unwrap_or_else(|| policy.default_value());
            let merged = merge_value(
                policy,
                &declared.name,
                &sibling.name,
                &declared.default_value,
                &current,
                levels,
            )?;

            if let Some(next) = merged {
                adopt(&mut config, &mut changes, &declared.name, &sibling.name, current, next)?;
            }
        }

        absorbed.push(absorb(sibling));
    }

    for (option, declared) in &numeric {
        let current = config
            .value(option)
            .cloned()
            .unwrap_or(OptionValue::Number(0.0));
        let local_value = current.as_f64().unwrap_or(0.0);
        if let Some(chosen) = settle_numeric(option, local_value, declared)? {
            let next = OptionValue::Number(chosen.value);
            adopt(&mut config, &mut changes, option, chosen.sibling, current, next)?;
        }
    }

    Ok(Reconciliation {
        config,
        changes,
        absorbed,
    })
}

fn adopt(
    config: &mut ReconciledConfig,
    changes: &mut Vec<OptionChange>,
    option: &str,
    sibling: &str,
    from: OptionValue,
    to: OptionValue,
) -> Result<(), ReconcileError> {
    info!(option, sibling, from = %from, to = %to, "adopting sibling setting");
    // Only reachable with a value whose type differs from the option's.
    let expected = config.policy(option).map(|p| p.expected_type());
    config
        .set(option, to.clone())
        .map_err(|_| ReconcileError::TypeMismatch {
            option: option.to_string(),
            sibling: sibling.to_string(),
            expected: expected.unwrap_or(to.value_type()),
            found: to.value_type(),
        })?;
    changes.push(OptionChange {
        option: option.to_string(),
        sibling: sibling.to_string(),
        from,
        to,
    });
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct NumericDeclaration<'a> {
    value: f64,
    sibling: &'a str,
}

/// Settle a tolerant numeric option over all sibling declarations at once.
///
/// Values `<= 0` (local or sibling) are unset and take no part. Every
/// remaining value must be within tolerance of the smallest one; the
/// largest sibling value is adopted (lowest suffix on ties). Which sibling
/// declares which value does not change whether this fails.
fn settle_numeric<'a>(
    option: &str,
    local_value: f64,
    declared: &[NumericDeclaration<'a>],
) -> Result<Option<NumericDeclaration<'a>>, ReconcileError> {
    let mut positive = declared.iter().copied().filter(|d| d.value > 0.0);
    let Some(first) = positive.next() else {
        return Ok(None);
    };
    let (low, high) = positive.fold((first, first), |(lo, hi), d| {
        (
            if d.value < lo.value { d } else { lo },
            if d.value > hi.value { d } else { hi },
        )
    });

    let local = (local_value > 0.0).then_some(local_value);
    let floor = local.map_or(low.value, |l| l.min(low.value));
    let ceiling = local.map_or(high.value, |l| l.max(high.value));

    if !Tolerance::DEFAULT.is_close(ceiling, floor) {
        // Report a sibling extreme against the opposite extreme, naming the
        // local value whenever it is one of the two.
        let err = match local {
            Some(l) if l <= low.value => numeric_mismatch(option, high, None, l),
            Some(l) if l >= high.value => numeric_mismatch(option, low, None, l),
            _ => numeric_mismatch(option, high, Some(low.sibling), low.value),
        };
        return Err(err);
    }

    Ok((local != Some(high.value)).then_some(high))
}

fn numeric_mismatch(
    option: &str,
    flagged: NumericDeclaration<'_>,
    reference: Option<&str>,
    reference_value: f64,
) -> ReconcileError {
    ReconcileError::NumericInconsistent {
        option: option.to_string(),
        sibling: flagged.sibling.to_string(),
        sibling_value: flagged.value,
        reference: reference.map(str::to_string),
        reference_value,
    }
}

/// Apply one policy. `Ok(Some(v))` = adopt `v`, `Ok(None)` = keep local.
fn merge_value(
    policy: MergePolicy,
    option: &str,
    sibling: &str,
    theirs: &OptionValue,
    ours: &OptionValue,
    levels: &dyn LogLevelLookup,
) -> Result<Option<OptionValue>, ReconcileError> {
    match (policy, theirs, ours) {
        (MergePolicy::StrictBool, OptionValue::Bool(s), OptionValue::Bool(l)) => {
            if s != l {
                return Err(ReconcileError::StrictInconsistent {
                    option: option.to_string(),
                    sibling: sibling.to_string(),
                    sibling_value: theirs.clone(),
                    local_value: ours.clone(),
                });
            }
            Ok(None)
        }

        // Baseline is `false`, so every non-baseline sibling says `true`:
        // the outcome does not depend on which sibling is seen first.
        (MergePolicy::AdoptIfSet, OptionValue::Bool(s), OptionValue::Bool(l)) => {
            Ok((*s && !*l).then_some(OptionValue::Bool(true)))
        }

        (
            MergePolicy::Accumulate { separator, absorb },
            OptionValue::Text(s),
            OptionValue::Text(l),
        ) => {
            let merged = if absorb {
                union_entries(l, s, separator)
            } else {
                append_list(l, s, separator)
            };
            Ok(merged.map(OptionValue::Text))
        }

        (MergePolicy::SeverityRanked, OptionValue::Text(s), OptionValue::Text(l)) => {
            let Some(theirs_rank) = levels.find_log_level(s) else {
                return Ok(None);
            };
            let adopt = match levels.find_log_level(l) {
                None => true,
                Some(ours_rank) => theirs_rank < ours_rank,
            };
            Ok(adopt.then(|| OptionValue::Text(s.clone())))
        }

        // Types are checked by the caller; Local is never reconciled and
        // tolerant numerics are settled separately.
        _ => Ok(None),
    }
}

/// Append the sibling's list verbatim. `None` when it declares nothing.
fn append_list(ours: &str, theirs: &str, separator: char) -> Option<String> {
    if theirs.trim().is_empty() {
        return None;
    }
    Some(if ours.is_empty() {
        theirs.to_string()
    } else {
        format!("{ours}{separator}{theirs}")
    })
}

/// Append the sibling's entries not already present locally, so an
/// absorbed list is registered once. `None` when nothing new was added.
fn union_entries(ours: &str, theirs: &str, separator: char) -> Option<String> {
    let present: Vec<&str> = split_list(ours, separator).collect();
    let mut added: Vec<&str> = Vec::new();
    for item in split_list(theirs, separator) {
        if !present.contains(&item) && !added.contains(&item) {
            added.push(item);
        }
    }
    if added.is_empty() {
        return None;
    }

    let sep = separator.to_string();
    let tail = added.join(&sep);
    Some(if ours.trim().is_empty() {
        tail
    } else {
        format!("{ours}{sep}{tail}")
    })
}

fn split_list(s: &str, separator: char) -> impl Iterator<Item = &str> {
    s.split(separator).map(str::trim).filter(|item| !item.is_empty())
}

fn absorb(sibling: &ShardDescriptor) -> ShardDescriptor {
    CATALOGUE
        .iter()
        .filter(|spec| matches!(spec.policy, MergePolicy::Accumulate { absorb: true, .. }))
        .fold(sibling.clone(), |view, spec| view.with_cleared(spec.name))
}
