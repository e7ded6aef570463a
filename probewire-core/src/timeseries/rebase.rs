use super::Series;

impl Series {
    /// Copy of this series with every timestamp shifted by `offset_ms`.
    #[must_use]
    pub fn shifted(&self, offset_ms: i64) -> Self {
        Self {
            label: self.label.clone(),
            timestamps: self
                .timestamps
                .iter()
                .map(|t| t.saturating_add(offset_ms))
                .collect(),
            values: self.values.clone(),
        }
    }

    /// Copy of this series moved so that its first sample lands at `origin_ms`.
    #[must_use]
    pub fn rebased(&self, origin_ms: i64) -> Self {
        match self.first_timestamp() {
            Some(first) => self.shifted(origin_ms.saturating_sub(first)),
            None => self.clone(),
        }
    }
}

/// Shift a set of channels so that the earliest sample across all of them lands
/// at `origin_ms`, preserving their relative alignment.
pub fn rebase_all(series: &mut [Series], origin_ms: i64) {
    let Some(min_first) = series.iter().filter_map(Series::first_timestamp).min() else {
        return;
    };
    let offset = origin_ms.saturating_sub(min_first);
    for s in series.iter_mut() {
        *s = s.shifted(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_all_keeps_channels_aligned() {
        let mut set = vec![
            Series::new("Pit", [(100, 1.0), (160, 2.0)]).unwrap(),
            Series::new("Probe 1", [(130, 5.0)]).unwrap(),
            Series::new("Empty", []).unwrap(),
        ];
        rebase_all(&mut set, 10_000);
        assert_eq!(set[0].timestamps(), &[10_000, 10_060]);
        assert_eq!(set[1].timestamps(), &[10_030]);
        assert!(set[2].is_empty());
    }

    #[test]
    fn rebased_moves_first_sample_to_origin() {
        let s = Series::new("Pit", [(-50, 1.0), (0, 2.0)]).unwrap();
        let r = s.rebased(1_000);
        assert_eq!(r.timestamps(), &[1_000, 1_050]);
        assert_eq!(r.values(), s.values());
    }
}
