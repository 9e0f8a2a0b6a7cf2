//! Schema descriptor: the hand-authored description of the tables the agent
//! may query, rendered verbatim into its standing instruction.
//!
//! Layout:
//! - `rate_card.rs`: the built-in descriptor (RATES, CLIENT, DEAL, TRADE)

pub mod rate_card;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

/// Foreign-key style join rule: `from_table.from_column = to_table.to_column`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDescriptor {
    pub tables: Vec<TableSpec>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl SchemaDescriptor {
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"("Column Name":"{}","Description":"{}","Type":"{}")"#,
            self.name, self.description, self.data_type
        )
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table: {} = [", self.name)?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{col}")?;
        }
        f.write_char(']')
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relationship : {}.{} = {}.{}",
            self.from_table, self.from_column, self.to_table, self.to_column
        )
    }
}

/// One `table:` line per table followed by one `Relationship :` line per join.
impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{table}")?;
        }
        for rel in &self.relationships {
            writeln!(f, "{rel}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_renders_in_descriptor_tuple_format() {
        let col = ColumnSpec {
            name: "RATE_ID".to_string(),
            description: "Rate Id".to_string(),
            data_type: "NUMBER".to_string(),
        };
        assert_eq!(
            col.to_string(),
            r#"("Column Name":"RATE_ID","Description":"Rate Id","Type":"NUMBER")"#
        );
    }

    #[test]
    fn descriptor_renders_tables_then_relationships() {
        let schema = SchemaDescriptor {
            tables: vec![TableSpec {
                name: "DEAL".to_string(),
                columns: vec![
                    ColumnSpec {
                        name: "DEAL_ID".to_string(),
                        description: "Deal Id".to_string(),
                        data_type: "NUMBER".to_string(),
                    },
                    ColumnSpec {
                        name: "CLIENT_ID".to_string(),
                        description: String::new(),
                        data_type: "NUMBER(10,0)".to_string(),
                    },
                ],
            }],
            relationships: vec![Relationship {
                from_table: "DEAL".to_string(),
                from_column: "CLIENT_ID".to_string(),
                to_table: "CLIENT".to_string(),
                to_column: "CLIENT_ID".to_string(),
            }],
        };
        let text = schema.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("table: DEAL = [(\"Column Name\":\"DEAL_ID\""));
        assert!(lines[0].ends_with(r#""Type":"NUMBER(10,0)")]"#));
        assert_eq!(lines[1], "Relationship : DEAL.CLIENT_ID = CLIENT.CLIENT_ID");
    }
}
