use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::{DVConfig, DVError, SortOrder};
use crate::schema::{Align, Column, Schema};

/// One row of the derived view.
pub struct ViewRow<'a, T> {
    /// Position of the record in the source collection.
    pub id: usize,
    pub record: &'a T,
    pub selected: bool,
    /// Display strings, one per visible column.
    pub cells: Vec<String>,
}

/// One visible column of the derived view.
pub struct ViewColumn<'a> {
    pub field: &'a str,
    pub label: &'a str,
    pub sortable: bool,
    pub align: Align,
    /// Set if this is the active sort column.
    pub order: Option<SortOrder>,
    /// True if this column has an active filter.
    pub filtered: bool,
}

/// The derived, display-ready projection of the source records.
pub struct ViewSnapshot<'a, T> {
    pub rows: Vec<ViewRow<'a, T>>,
    pub columns: Vec<ViewColumn<'a>>,
    /// Records passing all active filters, before pagination.
    pub filtered_count: usize,
    pub page_index: usize,
    pub page_count: usize,
    /// Selected records among those passing the active filters.
    pub selected_count: usize,
}

/// Filtered, sorted, paginated and selectable view over an immutable
/// record collection.
///
/// The engine owns four state slices (filters, sort, selection, page)
/// plus a derived row mapping: the ids of records passing every filter,
/// in sort order. The mapping is rebuilt from scratch whenever filters
/// or sort change, so clearing the sort restores source order exactly.
/// Renderers mutate through the operations below and re-read [`view`]
/// afterwards; records themselves are never touched.
///
/// [`view`]: TableEngine::view
#[derive(Debug)]
pub struct TableEngine<T> {
    records: Vec<T>,
    schema: Schema<T>,
    config: DVConfig,
    filters: HashMap<String, String>,
    sort: Option<(String, SortOrder)>,
    selected: HashSet<usize>,
    page: usize,
    rows: Vec<usize>, // Mapping of view row position to record id
}

impl<T> TableEngine<T> {
    pub fn new(records: Vec<T>, schema: Schema<T>, config: DVConfig) -> Result<Self, DVError> {
        let mut config = config;
        config.page_size = config.page_size.max(1);
        if let Some(field) = &config.default_search_field
            && !schema.contains(field)
        {
            return Err(DVError::UnknownField(field.clone()));
        }

        let engine = TableEngine {
            rows: (0..records.len()).collect(),
            records,
            schema,
            config,
            filters: HashMap::new(),
            sort: None,
            selected: HashSet::new(),
            page: 0,
        };
        debug!(
            "New table engine: {} records, {} columns, page size {}",
            engine.records.len(),
            engine.schema.len(),
            engine.config.page_size
        );
        Ok(engine)
    }

    // ------------------------ Mutation entry points ------------------------ //

    /// Set or clear the substring filter on one column. An empty `text`
    /// clears the filter. Matching is case-insensitive against the
    /// column's display text. Selection and sort are untouched; the page
    /// index is re-clamped since the filtered count may shrink.
    pub fn set_filter(&mut self, field: &str, text: &str) -> Result<(), DVError> {
        if !self.schema.contains(field) {
            return Err(DVError::UnknownField(field.to_string()));
        }
        if text.is_empty() {
            self.filters.remove(field);
        } else {
            self.filters.insert(field.to_string(), text.to_string());
        }
        self.refresh_rows();
        debug!(
            "Filter \"{}\" on \"{field}\": {} of {} rows match",
            text,
            self.rows.len(),
            self.records.len()
        );
        Ok(())
    }

    /// Explicitly set or clear the single active sort column.
    pub fn set_sort(&mut self, field: &str, order: Option<SortOrder>) -> Result<(), DVError> {
        let column = self
            .schema
            .get(field)
            .ok_or_else(|| DVError::UnknownField(field.to_string()))?;
        if !column.sortable {
            return Err(DVError::NotSortable(field.to_string()));
        }
        self.sort = order.map(|o| (field.to_string(), o));
        self.refresh_rows();
        debug!("Sort: {:?}", self.sort);
        Ok(())
    }

    /// Header-click sort policy: on the active sort column cycle
    /// ascending, descending, unsorted; on any other sortable column
    /// start at ascending, dropping the previous column's sort.
    pub fn cycle_sort(&mut self, field: &str) -> Result<(), DVError> {
        let next = match &self.sort {
            Some((current, SortOrder::Ascending)) if current == field => {
                Some(SortOrder::Descending)
            }
            Some((current, SortOrder::Descending)) if current == field => None,
            _ => Some(SortOrder::Ascending),
        };
        self.set_sort(field, next)
    }

    /// Flip selection of one record. Any id is accepted; records outside
    /// the current filter stay selectable in memory.
    pub fn toggle_row_selected(&mut self, id: usize) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        trace!("Selection toggled for record {id}");
    }

    /// Set selection for every record currently passing the filters
    /// (before pagination). Records outside the filtered set keep their
    /// selection state.
    pub fn toggle_all_visible_selected(&mut self, selected: bool) {
        for &id in self.rows.iter() {
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
        trace!(
            "Selection set to {selected} for {} filtered rows",
            self.rows.len()
        );
    }

    /// Jump to a page. Rejects indices past the last valid page and
    /// leaves the current page unchanged in that case. With an empty
    /// filtered set only page 0 is valid.
    pub fn set_page(&mut self, index: usize) -> Result<(), DVError> {
        let pages = self.page_count();
        if index >= pages.max(1) {
            return Err(DVError::PageOutOfRange {
                requested: index,
                pages,
            });
        }
        self.page = index;
        Ok(())
    }

    /// Advance one page, saturating at the last.
    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    /// Go back one page, saturating at the first.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Hide or show one column. Hidden columns keep their active filters.
    pub fn set_column_hidden(&mut self, field: &str, hidden: bool) -> Result<(), DVError> {
        let column = self
            .schema
            .get_mut(field)
            .ok_or_else(|| DVError::UnknownField(field.to_string()))?;
        column.hidden = hidden;
        Ok(())
    }

    pub fn show_all_columns(&mut self) {
        for column in self.schema.columns_mut() {
            column.hidden = false;
        }
    }

    // --------------------------- Derivation -------------------------------- //

    /// Derive the current page of the view. Pure: no state changes.
    pub fn view(&self) -> ViewSnapshot<'_, T> {
        let visible: Vec<&Column<T>> = self.schema.visible().collect();

        let columns = visible
            .iter()
            .map(|c| ViewColumn {
                field: c.field.as_str(),
                label: c.label.as_str(),
                sortable: c.sortable,
                align: c.align,
                order: match &self.sort {
                    Some((field, order)) if field == &c.field => Some(*order),
                    _ => None,
                },
                filtered: self.filters.contains_key(&c.field),
            })
            .collect();

        let begin = usize::min(self.page * self.page_size(), self.rows.len());
        let end = usize::min(begin + self.page_size(), self.rows.len());
        let rows = self.rows[begin..end]
            .iter()
            .map(|&id| {
                let record = &self.records[id];
                ViewRow {
                    id,
                    record,
                    selected: self.selected.contains(&id),
                    cells: visible.iter().map(|c| c.cell_text(record)).collect(),
                }
            })
            .collect();

        ViewSnapshot {
            rows,
            columns,
            filtered_count: self.rows.len(),
            page_index: self.page,
            page_count: self.page_count(),
            selected_count: self
                .rows
                .iter()
                .filter(|id| self.selected.contains(id))
                .count(),
        }
    }

    /// One record as a single CSV line, every column included (hidden
    /// ones too), formatted. `None` for an id outside the collection.
    pub fn row_as_csv(&self, id: usize) -> Option<String> {
        let record = self.records.get(id)?;
        let cells = self
            .schema
            .columns()
            .iter()
            .map(|c| Self::wrap_cell_content(&c.cell_text(record)))
            .collect::<Vec<String>>();
        Some(cells.join(","))
    }

    fn wrap_cell_content(cell: &str) -> String {
        let needs_escaping = cell.contains('"');
        let needs_wrapping =
            needs_escaping || cell.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(cell);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping {
            out = format!("\"{out}\"");
        }
        out
    }

    // --------------------------- Accessors --------------------------------- //

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Records passing all active filters, before pagination.
    pub fn filtered_count(&self) -> usize {
        self.rows.len()
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.config.page_size)
    }

    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }

    /// Selected record ids in ascending order, filtered or not.
    pub fn selected_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn active_filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    pub fn sort(&self) -> Option<(&str, SortOrder)> {
        self.sort.as_ref().map(|(field, order)| (field.as_str(), *order))
    }

    pub fn default_search_field(&self) -> Option<&str> {
        self.config.default_search_field.as_deref()
    }

    // --------------------------- Internals --------------------------------- //

    // Rebuild the row mapping: filter from source order, then stable
    // sort by the active column's raw value. Re-clamps the page.
    fn refresh_rows(&mut self) {
        let mut rows: Vec<usize> = (0..self.records.len())
            .filter(|&id| self.passes_filters(&self.records[id]))
            .collect();

        if let Some((field, order)) = self.sort.clone()
            && let Some(column) = self.schema.get(&field)
        {
            let records = &self.records;
            rows.sort_by(|&a, &b| {
                let ordering = column.value(&records[a]).compare(&column.value(&records[b]));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        self.rows = rows;
        self.clamp_page();
    }

    // Logical AND across all column filters.
    fn passes_filters(&self, record: &T) -> bool {
        self.filters.iter().all(|(field, needle)| {
            match self.schema.get(field) {
                Some(column) => column
                    .cell_text(record)
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                // Filters are validated against the schema on entry.
                None => true,
            }
        })
    }

    fn clamp_page(&mut self) {
        let pages = self.page_count();
        let clamped = if pages == 0 {
            0
        } else {
            usize::min(self.page, pages - 1)
        };
        if clamped != self.page {
            trace!("Page clamped {} -> {clamped} ({pages} pages)", self.page);
            self.page = clamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets;
    use crate::value::CellValue;

    fn uploads() -> TableEngine<datasets::Upload> {
        TableEngine::new(
            datasets::uploads(),
            datasets::upload_columns(),
            DVConfig::default(),
        )
        .unwrap()
    }

    fn files() -> TableEngine<datasets::StoredFile> {
        TableEngine::new(
            datasets::files(),
            datasets::file_columns(),
            DVConfig::default(),
        )
        .unwrap()
    }

    fn payments() -> TableEngine<datasets::Payment> {
        TableEngine::new(
            datasets::payments(),
            datasets::payment_columns(),
            DVConfig::default(),
        )
        .unwrap()
    }

    fn visible_ids<T>(engine: &TableEngine<T>) -> Vec<usize> {
        engine.view().rows.iter().map(|r| r.id).collect()
    }

    fn upload_names(engine: &TableEngine<datasets::Upload>) -> Vec<String> {
        engine
            .view()
            .rows
            .iter()
            .map(|r| r.record.upload_name.clone())
            .collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring_match() {
        let mut engine = uploads();
        engine.set_filter("upload_name", "pro").unwrap();

        assert_eq!(
            upload_names(&engine),
            vec!["Project Report", "Profile Picture"]
        );
        let snapshot = engine.view();
        assert_eq!(snapshot.filtered_count, 2);
        assert_eq!(snapshot.page_index, 0);
    }

    #[test]
    fn clearing_a_filter_restores_the_unfiltered_view() {
        let mut engine = uploads();
        let before = visible_ids(&engine);

        engine.set_filter("upload_name", "pro").unwrap();
        engine.set_filter("upload_name", "").unwrap();

        assert_eq!(visible_ids(&engine), before);
        assert_eq!(engine.active_filter("upload_name"), None);
    }

    #[test]
    fn filters_on_different_columns_are_anded() {
        let mut engine = uploads();
        engine.set_filter("upload_name", "pi").unwrap();
        engine.set_filter("source", "local").unwrap();

        // "pi" alone matches only "Profile Picture", which is a web
        // upload, so both filters together match nothing; relaxing the
        // name filter brings back exactly the local uploads.
        assert_eq!(visible_ids(&engine), Vec::<usize>::new());

        engine.set_filter("upload_name", "").unwrap();
        assert_eq!(visible_ids(&engine), vec![0, 2, 4]);
    }

    #[test]
    fn unknown_filter_field_is_rejected_without_side_effects() {
        let mut engine = uploads();
        let err = engine.set_filter("nope", "x").unwrap_err();

        assert!(matches!(err, DVError::UnknownField(field) if field == "nope"));
        assert_eq!(engine.filtered_count(), 5);
    }

    #[test]
    fn filter_matches_formatted_cell_text() {
        let mut engine = uploads();
        // The date column renders "8/12/2023"; the raw value would be
        // "2023-08-12".
        engine.set_filter("created_at", "8/12/").unwrap();
        assert_eq!(visible_ids(&engine), vec![0]);
    }

    #[test]
    fn sort_orders_dates_chronologically() {
        let mut engine = uploads();
        engine.cycle_sort("created_at").unwrap();

        let dates: Vec<String> = engine
            .view()
            .rows
            .iter()
            .map(|r| r.record.created_at.to_string())
            .collect();
        assert_eq!(
            dates,
            vec![
                "2023-08-12",
                "2023-09-05",
                "2024-01-10",
                "2024-02-20",
                "2024-03-15"
            ]
        );

        engine.cycle_sort("created_at").unwrap();
        let reversed: Vec<usize> = visible_ids(&engine);
        assert_eq!(reversed, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn sort_cycle_returns_to_insertion_order() {
        let mut engine = files();

        engine.cycle_sort("file_name").unwrap();
        assert_eq!(visible_ids(&engine), vec![3, 4, 1, 0, 2]);

        engine.cycle_sort("file_name").unwrap();
        assert_eq!(visible_ids(&engine), vec![2, 0, 1, 4, 3]);

        engine.cycle_sort("file_name").unwrap();
        assert_eq!(visible_ids(&engine), vec![0, 1, 2, 3, 4]);
        assert!(engine.sort().is_none());
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut engine = uploads();
        engine.cycle_sort("source").unwrap();

        // "local" rows keep their relative source order, then "web" rows.
        assert_eq!(visible_ids(&engine), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn sorting_a_second_column_replaces_the_first() {
        let mut engine = uploads();
        engine.cycle_sort("created_at").unwrap();
        engine.cycle_sort("source").unwrap();

        assert_eq!(engine.sort(), Some(("source", SortOrder::Ascending)));
    }

    #[test]
    fn unsortable_column_is_rejected() {
        let mut engine = uploads();
        let err = engine.cycle_sort("upload_name").unwrap_err();

        assert!(matches!(err, DVError::NotSortable(field) if field == "upload_name"));
        assert!(engine.sort().is_none());
    }

    #[test]
    fn selection_survives_sorting() {
        let mut engine = uploads();
        engine.toggle_row_selected(2);
        engine.cycle_sort("created_at").unwrap();
        engine.cycle_sort("created_at").unwrap();

        assert!(engine.is_selected(2));
        let snapshot = engine.view();
        let selected: Vec<usize> = snapshot
            .rows
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.id)
            .collect();
        assert_eq!(selected, vec![2]);
    }

    #[test]
    fn selection_is_not_pruned_by_filtering() {
        let mut engine = uploads();
        engine.toggle_row_selected(2); // "Sales Data"
        engine.set_filter("upload_name", "pro").unwrap();

        // Filtered out, still selected in memory, not counted as a
        // filtered selection.
        assert!(engine.is_selected(2));
        assert_eq!(engine.view().selected_count, 0);

        engine.set_filter("upload_name", "").unwrap();
        assert_eq!(engine.view().selected_count, 1);
    }

    #[test]
    fn toggle_all_only_touches_the_filtered_set() {
        let mut engine = payments();
        engine.toggle_row_selected(0); // outside the filter below

        engine.set_filter("email", "gmail").unwrap();
        let filtered = engine.filtered_count();
        assert_eq!(filtered, 3);

        engine.toggle_all_visible_selected(true);
        assert_eq!(engine.view().selected_count, filtered);
        assert_eq!(engine.selected_ids().len(), filtered + 1);

        engine.toggle_all_visible_selected(false);
        assert_eq!(engine.view().selected_count, 0);
        assert_eq!(engine.selected_ids(), vec![0]);
    }

    #[test]
    fn page_index_is_clamped_when_the_filter_shrinks_the_set() {
        let mut engine = payments();
        assert_eq!(engine.page_count(), 11); // 105 records, 10 per page

        engine.set_page(10).unwrap();
        assert_eq!(engine.view().page_index, 10);
        assert_eq!(engine.view().rows.len(), 5);

        engine.set_filter("email", "carmella").unwrap();
        let snapshot = engine.view();
        assert_eq!(snapshot.filtered_count, 1);
        assert_eq!(snapshot.page_index, 0);
        assert_eq!(snapshot.page_count, 1);
    }

    #[test]
    fn out_of_range_page_is_rejected_without_side_effects() {
        let mut engine = payments();
        engine.set_page(3).unwrap();

        let err = engine.set_page(11).unwrap_err();
        assert!(matches!(
            err,
            DVError::PageOutOfRange {
                requested: 11,
                pages: 11
            }
        ));
        assert_eq!(engine.view().page_index, 3);
    }

    #[test]
    fn empty_result_set_keeps_page_zero() {
        let mut engine = uploads();
        engine.set_filter("upload_name", "zzz").unwrap();

        let snapshot = engine.view();
        assert_eq!(snapshot.filtered_count, 0);
        assert_eq!(snapshot.page_count, 0);
        assert_eq!(snapshot.page_index, 0);
        assert!(snapshot.rows.is_empty());
        assert!(engine.set_page(1).is_err());
    }

    #[test]
    fn next_and_prev_saturate_at_the_bounds() {
        let mut engine = uploads();
        engine.prev_page();
        assert_eq!(engine.view().page_index, 0);
        engine.next_page();
        assert_eq!(engine.view().page_index, 0); // 5 records fit one page
    }

    #[test]
    fn hidden_columns_disappear_but_their_filters_apply() {
        let mut engine = uploads();
        engine.set_filter("source", "web").unwrap();
        engine.set_column_hidden("source", true).unwrap();

        let snapshot = engine.view();
        let fields: Vec<&str> = snapshot.columns.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["upload_name", "created_at"]);
        assert_eq!(snapshot.rows[0].cells.len(), 2);
        assert_eq!(snapshot.filtered_count, 2);

        engine.show_all_columns();
        assert_eq!(engine.view().columns.len(), 3);
    }

    #[test]
    fn formatter_output_reaches_the_cells() {
        let engine = payments();
        let snapshot = engine.view();
        let amount_cell = &snapshot.rows[0].cells[2];
        assert_eq!(amount_cell, "$316.00");
    }

    #[test]
    fn row_as_csv_wraps_and_escapes() {
        let engine = uploads();
        assert_eq!(
            engine.row_as_csv(0).unwrap(),
            "\"Project Report\",local,8/12/2023"
        );
        assert!(engine.row_as_csv(99).is_none());

        let schema = Schema::new(vec![Column::new("value", "Value", |s: &String| {
            CellValue::from(s.as_str())
        })]);
        let engine =
            TableEngine::new(vec!["say \"hi\"".to_string()], schema, DVConfig::default()).unwrap();
        assert_eq!(engine.row_as_csv(0).unwrap(), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn page_size_has_a_floor_of_one() {
        let engine = TableEngine::new(
            datasets::uploads(),
            datasets::upload_columns(),
            DVConfig::default().page_size(0),
        )
        .unwrap();
        assert_eq!(engine.page_size(), 1);
        assert_eq!(engine.page_count(), 5);
    }

    #[test]
    fn default_search_field_must_exist_in_the_schema() {
        let err = TableEngine::new(
            datasets::uploads(),
            datasets::upload_columns(),
            DVConfig::default().default_search_field("nope".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, DVError::UnknownField(field) if field == "nope"));
    }
}
