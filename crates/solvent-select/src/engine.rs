use std::path::Path;

use serde::Serialize;
use solvent_select_core::{
    combine_masks, greenness_mask, hazard_mask, CompositeScorer, CoreError, HansenCoordinate,
    PathSuggester, PhysicalProperty, ReferencePoint, ScoreGroups, ScoredSolvent, ScoredView,
    SolventRecord, SuggestedPath,
};
use solvent_select_ghs::StatementTable;
use solvent_select_table::{rank_solvents, SolventTable};

use crate::config::EngineConfig;
use crate::error::SelectError;
use crate::report::SolventReport;
use crate::spec::{FilterSpec, ReferenceSource};

/// Ranked, capped result of one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub reference: Option<HansenCoordinate>,
    /// Rows passing every filter, before the cap.
    pub matched: usize,
    pub rows: Vec<ScoredSolvent>,
}

impl Selection {
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(ScoredSolvent::name).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSelection {
    pub reference: Option<HansenCoordinate>,
    pub path: SuggestedPath,
    /// Full rows for each step, in path order.
    pub rows: Vec<ScoredSolvent>,
}

/// Shared read-only state plus the per-request pipeline: score, measure,
/// filter, then rank or walk a path. Every call recomputes from scratch.
pub struct SelectionEngine {
    table: SolventTable,
    groups: ScoreGroups,
    statements: StatementTable,
    scorer: CompositeScorer,
    config: EngineConfig,
}

impl SelectionEngine {
    pub fn new(
        records: Vec<SolventRecord>,
        groups: ScoreGroups,
        statements: StatementTable,
        config: EngineConfig,
    ) -> Result<Self, SelectError> {
        let scorer = CompositeScorer::new(config.rounding);
        let table = SolventTable::from_records(records, &groups, &scorer)?;
        log::debug!(
            "selection engine ready: {} solvents, {} statements",
            table.len(),
            statements.len()
        );
        Ok(Self {
            table,
            groups,
            statements,
            scorer,
            config,
        })
    }

    /// Loads a dataset file with the GSK groups and the bundled statements.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, SelectError> {
        let groups = ScoreGroups::gsk();
        let scorer = CompositeScorer::new(config.rounding);
        let table = SolventTable::open(path, &groups, &scorer)?;
        let statements = StatementTable::builtin()?;
        Ok(Self {
            table,
            groups,
            statements,
            scorer,
            config,
        })
    }

    pub fn table(&self) -> &SolventTable {
        &self.table
    }

    pub fn groups(&self) -> &ScoreGroups {
        &self.groups
    }

    pub fn statements(&self) -> &StatementTable {
        &self.statements
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn default_spec(&self) -> FilterSpec {
        FilterSpec::reset(&self.table)
    }

    pub fn hazard_options(&self) -> Vec<&str> {
        self.statements.hazard_codes()
    }

    pub fn resolve_reference(
        &self,
        source: &ReferenceSource,
    ) -> Result<ReferencePoint, SelectError> {
        match source {
            ReferenceSource::Unset => Ok(ReferencePoint::unset()),
            ReferenceSource::Coordinates(point) => Ok(*point),
            ReferenceSource::Solvents(names) => {
                let records = names
                    .iter()
                    .map(|name| {
                        self.table
                            .get(name)
                            .ok_or_else(|| SelectError::UnknownSolvent(name.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ReferencePoint::mean_of(records))
            }
        }
    }

    /// Distances and scores for this request over the whole table.
    pub fn view(&self, spec: &FilterSpec) -> Result<ScoredView, SelectError> {
        let reference = self.resolve_reference(&spec.reference)?;
        let selection = self.groups.select(&spec.metrics)?;
        Ok(ScoredView::compute(
            self.table.records(),
            self.table.baseline_scores(),
            &reference,
            &selection,
            &self.scorer,
        ))
    }

    /// AND of the greenness, hazard and property range masks.
    pub fn filter_mask(
        &self,
        view: &ScoredView,
        spec: &FilterSpec,
    ) -> Result<Vec<bool>, SelectError> {
        for range in [&spec.boiling_point, &spec.viscosity, &spec.surface_tension] {
            range.validate()?;
        }
        let records = self.table.records();
        let bounds = self.config.range_bounds;
        let property = |p: PhysicalProperty| records.iter().map(move |r| r.property(p));

        let greenness = greenness_mask(&view.scores(), spec.greenness_threshold);
        let hazards = hazard_mask(records, &spec.excluded_hazards);
        let boiling = spec
            .boiling_point
            .mask(property(PhysicalProperty::BoilingPoint), bounds);
        let viscosity = spec
            .viscosity
            .mask(property(PhysicalProperty::Viscosity), bounds);
        let surface = spec
            .surface_tension
            .mask(property(PhysicalProperty::SurfaceTension), bounds);

        Ok(combine_masks(
            records.len(),
            &[
                greenness.as_slice(),
                hazards.as_slice(),
                boiling.as_slice(),
                viscosity.as_slice(),
                surface.as_slice(),
            ],
        ))
    }

    pub fn select(&self, spec: &FilterSpec) -> Result<Selection, SelectError> {
        let view = self.view(spec)?;
        let mask = self.filter_mask(&view, spec)?;
        let matched = mask.iter().filter(|keep| **keep).count();
        let rows = rank_solvents(&view.rows, &mask, spec.order, spec.limit);
        log::debug!(
            "selection: {matched} of {} solvents matched, {} returned",
            self.table.len(),
            rows.len()
        );
        Ok(Selection {
            reference: view.reference,
            matched,
            rows,
        })
    }

    /// Greedy path towards greener solvents among the filtered set. A single
    /// known solvent in the reference seeds the path. The result cap keeps
    /// the nearest steps.
    pub fn suggest_path(&self, spec: &FilterSpec) -> Result<PathSelection, SelectError> {
        let view = self.view(spec)?;
        if !view.has_reference() {
            log::warn!("suggested path requested before solute coordinates were set");
            return Err(CoreError::SoluteUndefined.into());
        }
        let mask = self.filter_mask(&view, spec)?;
        let candidates = view.retain(&mask);
        let seed = spec.reference.single_solvent().and_then(|name| view.get(name));

        let mut path = PathSuggester::new(self.config.path).suggest(&candidates, seed)?;
        if let Some(limit) = spec.limit {
            path.truncate(limit);
        }
        let rows = path
            .steps
            .iter()
            .filter_map(|step| view.get(&step.name).cloned())
            .collect();
        Ok(PathSelection {
            reference: view.reference,
            path,
            rows,
        })
    }

    pub fn report(&self, name: &str, spec: &FilterSpec) -> Result<SolventReport, SelectError> {
        let view = self.view(spec)?;
        let row = view
            .get(name)
            .ok_or_else(|| SelectError::UnknownSolvent(name.to_string()))?;
        Ok(SolventReport::build(row, &self.groups, &self.statements))
    }
}
