use service_journal::cli::table::{Table, TableColumn};

#[test]
fn table_renders_with_box_rules() {
    let mut table = Table::new(vec![TableColumn::left("Name"), TableColumn::right("Amount")]);
    table.push(vec!["Oil".into(), "900".into()]);
    table.push(vec!["Brakes".into(), "12 000".into()]);
    table.push_footer(vec!["Total".into(), "12 900".into()]);

    insta::assert_snapshot!(table.render(), @r"
 Name   │ Amount
────────┼────────
 Oil    │    900
 Brakes │ 12 000
────────┼────────
 Total  │ 12 900
");
}

#[test]
fn short_rows_leave_trailing_cells_blank() {
    let mut table = Table::new(vec![
        TableColumn::left("Day"),
        TableColumn::left("Master"),
        TableColumn::right("Sum"),
    ]);
    table.push(vec!["Mon".into()]);
    table.push(vec!["".into(), "Danila".into(), "70".into()]);

    let widths = table.compute_widths();
    assert_eq!(widths, vec![3, 6, 3]);
    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[2], " Mon │        │");
    assert_eq!(lines[3], "     │ Danila │  70");
}
