use crate::error::Error;
use crate::list_stacks::{DependencyDetails, StackDetails};
use eyre::{Result, WrapErr};
use std::str::FromStr;
use term_table::row::Row;
use term_table::table_cell::TableCell;
use term_table::{Table, TableStyle};
use termcolor::{Color, ColorSpec, WriteColor};

const LONG_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Ids,
    Long,
    Json,
    Tree,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ids" => Ok(OutputFormat::Ids),
            "long" => Ok(OutputFormat::Long),
            "json" => Ok(OutputFormat::Json),
            "tree" => Ok(OutputFormat::Tree),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

pub(crate) struct Printer<W> {
    writer: W,
    width: Option<usize>,
}

impl<W> Printer<W>
where
    W: WriteColor,
{
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            width: None,
        }
    }

    /// Terminal width the long listing should fit in.
    pub(crate) fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    pub(crate) fn print(&mut self, stacks: &[StackDetails], format: OutputFormat) -> Result<()> {
        tracing::debug!(nstacks = stacks.len(), ?format, "printing stacks");
        match format {
            OutputFormat::Ids => self.print_ids(stacks),
            OutputFormat::Long => self.print_long(stacks),
            OutputFormat::Json => self.print_json(stacks),
            OutputFormat::Tree => self.print_tree(stacks),
        }
    }

    fn print_ids(&mut self, stacks: &[StackDetails]) -> Result<()> {
        for stack in stacks {
            writeln!(self.writer, "{}", stack.id).wrap_err("printing stack id")?;
        }
        Ok(())
    }

    fn print_long(&mut self, stacks: &[StackDetails]) -> Result<()> {
        let mut table = Table::new();
        table.style = TableStyle::thin();
        if let Some(width) = self.width {
            table.max_column_width = (width / LONG_COLUMNS).max(10);
        }

        table.add_row(Row::new(vec![
            TableCell::new("ID"),
            TableCell::new("NAME"),
            TableCell::new("ACCOUNT"),
            TableCell::new("REGION"),
            TableCell::new("DEPENDS ON"),
        ]));
        for stack in stacks {
            let depends_on = stack
                .dependencies
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(Row::new(vec![
                TableCell::new(&stack.id),
                TableCell::new(&stack.name),
                TableCell::new(&stack.environment.account),
                TableCell::new(&stack.environment.region),
                TableCell::new(depends_on),
            ]));
        }

        writeln!(self.writer, "{}", table.render()).wrap_err("printing stack table")?;
        Ok(())
    }

    fn print_json(&mut self, stacks: &[StackDetails]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, stacks).wrap_err("serializing stacks")?;
        writeln!(self.writer).wrap_err("printing end of json")?;
        Ok(())
    }

    fn print_tree(&mut self, stacks: &[StackDetails]) -> Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow)).set_bold(true);

        for stack in stacks {
            self.writer.set_color(&spec).wrap_err("setting color")?;
            write!(self.writer, "{}", stack.id).wrap_err("printing stack id")?;
            self.writer.reset().wrap_err("resetting colour")?;
            writeln!(self.writer, " ({})", stack.environment.name)
                .wrap_err("printing environment")?;
            self.print_dependencies(&stack.dependencies, "")?;
        }
        Ok(())
    }

    fn print_dependencies(&mut self, dependencies: &[DependencyDetails], prefix: &str) -> Result<()> {
        for (i, dependency) in dependencies.iter().enumerate() {
            let last = i + 1 == dependencies.len();
            let (branch, indent) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            writeln!(self.writer, "{}{}{}", prefix, branch, dependency.id)
                .wrap_err("printing dependency")?;
            self.print_dependencies(&dependency.dependencies, &format!("{}{}", prefix, indent))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use termcolor::{Buffer, NoColor};

    fn leaf(id: &str) -> DependencyDetails {
        DependencyDetails {
            id: id.to_string(),
            dependencies: vec![],
        }
    }

    fn stacks() -> Vec<StackDetails> {
        let env = Environment::new("123456789012", "bermuda-triangle-1");
        vec![
            StackDetails {
                id: "Network".into(),
                name: "Network".into(),
                environment: env.clone(),
                dependencies: vec![],
            },
            StackDetails {
                id: "Storage".into(),
                name: "prod-storage".into(),
                environment: env.clone(),
                dependencies: vec![],
            },
            StackDetails {
                id: "Prod/Api".into(),
                name: "Prod-Api".into(),
                environment: env,
                dependencies: vec![
                    DependencyDetails {
                        id: "Database".into(),
                        dependencies: vec![leaf("Network")],
                    },
                    leaf("Storage"),
                ],
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut printer = Printer::new(NoColor::new(Vec::new())).with_width(200);
        printer.print(&stacks(), format).unwrap();
        String::from_utf8(printer.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn parses_formats() {
        assert_eq!("ids".parse::<OutputFormat>().unwrap(), OutputFormat::Ids);
        assert_eq!("long".parse::<OutputFormat>().unwrap(), OutputFormat::Long);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("tree".parse::<OutputFormat>().unwrap(), OutputFormat::Tree);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(f)) if f == "yaml"
        ));
    }

    #[test]
    fn ids_are_one_per_line() {
        assert_eq!(render(OutputFormat::Ids), "Network\nStorage\nProd/Api\n");
    }

    #[test]
    fn tree_draws_nested_dependencies() {
        let expected = "\
Network (aws://123456789012/bermuda-triangle-1)
Storage (aws://123456789012/bermuda-triangle-1)
Prod/Api (aws://123456789012/bermuda-triangle-1)
├── Database
│   └── Network
└── Storage
";
        assert_eq!(render(OutputFormat::Tree), expected);
    }

    #[test]
    fn tree_colours_stack_ids() {
        let mut printer = Printer::new(Buffer::ansi());
        printer.print(&stacks()[..1], OutputFormat::Tree).unwrap();
        let out = String::from_utf8(printer.into_inner().into_inner()).unwrap();
        assert!(out.contains("\x1b["));
        assert!(out.contains("Network"));
    }

    #[test]
    fn json_round_trips_to_the_listing_shape() {
        let out = render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[2]["id"], "Prod/Api");
        assert_eq!(value[2]["dependencies"][0]["dependencies"][0]["id"], "Network");
        assert_eq!(value[1]["name"], "prod-storage");
    }

    #[test]
    fn long_listing_has_a_row_per_stack() {
        let out = render(OutputFormat::Long);
        for needle in &[
            "ID",
            "DEPENDS ON",
            "prod-storage",
            "Prod/Api",
            "123456789012",
            "bermuda-triangle-1",
            "Database",
        ] {
            assert!(out.contains(needle), "missing {} in\n{}", needle, out);
        }
    }
}
