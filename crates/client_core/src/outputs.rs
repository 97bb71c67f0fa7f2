use serde_json::Value;
use shared::{domain::TypeTag, protocol::ResultRow};

use crate::{
    error::{ClientError, Result},
    inputs::names_match,
    value::TypedValue,
};

/// Reshaped results of one run, tagged by run kind.
#[derive(Debug)]
pub enum RunOutputs {
    Single(SingleRunOutputs),
    Multi(MultiRunOutputs),
}

impl RunOutputs {
    pub fn into_single(self) -> Result<SingleRunOutputs> {
        match self {
            RunOutputs::Single(outputs) => Ok(outputs),
            RunOutputs::Multi(_) => Err(ClientError::InvalidOperation(
                "run produced multi-run outputs, not a single-run view".to_owned(),
            )),
        }
    }

    pub fn into_multi(self) -> Result<MultiRunOutputs> {
        match self {
            RunOutputs::Multi(outputs) => Ok(outputs),
            RunOutputs::Single(_) => Err(ClientError::InvalidOperation(
                "run produced single-run outputs, not a multi-run view".to_owned(),
            )),
        }
    }
}

/// One decoded output of a completed simulation.
#[derive(Debug, Clone)]
pub struct OutputValue {
    pub name: String,
    pub type_tag: TypeTag,
    pub units: Option<String>,
    pub value: TypedValue,
}

/// Flat name-to-value view over one simulation run's outputs.
#[derive(Debug)]
pub struct SingleRunOutputs {
    outputs: Vec<OutputValue>,
}

impl SingleRunOutputs {
    pub(crate) fn from_rows(rows: Vec<ResultRow>) -> Result<Self> {
        let outputs = rows
            .into_iter()
            .map(|row| {
                let descriptor = row.outputs.into_iter().next().ok_or_else(|| {
                    ClientError::ProtocolMismatch(format!(
                        "result row \"{}\" carries no output descriptor",
                        row.name
                    ))
                })?;
                let value = TypedValue::decode(&row.value, &row.type_tag)?;
                Ok(OutputValue {
                    name: descriptor.name,
                    type_tag: row.type_tag,
                    units: descriptor.units,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { outputs })
    }

    pub fn names(&self) -> Vec<&str> {
        self.outputs.iter().map(|output| output.name.as_str()).collect()
    }

    /// Finds the single output whose name contains `part` (case-insensitive).
    /// Zero matches is a lookup failure; several matches mean the fragment is
    /// ambiguous.
    pub fn find_name_including(&self, part: &str) -> Result<&str> {
        let needle = part.trim().to_lowercase();
        let matches: Vec<&str> = self
            .outputs
            .iter()
            .map(|output| output.name.as_str())
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        match matches.as_slice() {
            [] => Err(ClientError::NotFound(format!(
                "output name including \"{part}\""
            ))),
            [name] => Ok(name),
            _ => Err(ClientError::InvalidOperation(format!(
                "multiple output names include \"{part}\": {matches:?}"
            ))),
        }
    }

    /// Decoded value of the named output (case-insensitive lookup).
    pub fn value(&self, name: &str) -> Result<&TypedValue> {
        self.outputs
            .iter()
            .find(|output| names_match(&output.name, name))
            .map(|output| &output.value)
            .ok_or_else(|| ClientError::NotFound(format!("output value \"{name}\"")))
    }

    pub fn raw(&self) -> &[OutputValue] {
        &self.outputs
    }
}

/// Tabular view over a parameter variation's results.
///
/// The server returns columns: one row holds the matrix of swept input
/// combinations, every other row holds one output's values across those
/// combinations in the same order. Row `i` of each column belongs to sweep
/// point `i`.
#[derive(Debug)]
pub struct MultiRunOutputs {
    input_names: Vec<String>,
    input_rows: Vec<Vec<Value>>,
    output_columns: Vec<(String, Vec<Value>)>,
}

impl MultiRunOutputs {
    pub(crate) fn from_rows(rows: Vec<ResultRow>) -> Result<Self> {
        let sweep = rows
            .iter()
            .find(|row| !row.inputs.is_empty())
            .ok_or_else(|| {
                ClientError::ProtocolMismatch(
                    "results carry no sweep-point row (every row has empty inputs)".to_owned(),
                )
            })?;
        let input_names: Vec<String> = sweep
            .inputs
            .iter()
            .map(|parameter| parameter.name.clone())
            .collect();
        let input_rows: Vec<Vec<Value>> = serde_json::from_str(&sweep.value)?;
        if let Some(row) = input_rows
            .iter()
            .find(|row| row.len() != input_names.len())
        {
            return Err(ClientError::ProtocolMismatch(format!(
                "sweep-point row has {} values for {} swept inputs",
                row.len(),
                input_names.len()
            )));
        }

        let output_columns = rows
            .iter()
            .filter(|row| !row.outputs.is_empty())
            .map(|row| {
                let name = row.outputs[0].name.clone();
                let column: Vec<Value> = serde_json::from_str(&row.value)?;
                if column.len() != input_rows.len() {
                    return Err(ClientError::ProtocolMismatch(format!(
                        "output column \"{name}\" has {} values for {} sweep points",
                        column.len(),
                        input_rows.len()
                    )));
                }
                Ok((name, column))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            input_names,
            input_rows,
            output_columns,
        })
    }

    pub fn input_names(&self) -> Vec<&str> {
        self.input_names.iter().map(String::as_str).collect()
    }

    pub fn output_names(&self) -> Vec<&str> {
        self.output_columns
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// One value per sweep point for the named swept input.
    pub fn values_of_input(&self, name: &str) -> Result<Vec<&Value>> {
        let index = self
            .input_names
            .iter()
            .position(|input_name| names_match(input_name, name))
            .ok_or_else(|| {
                ClientError::NotFound(format!("input \"{name}\" (present and varied)"))
            })?;
        Ok(self.input_rows.iter().map(|row| &row[index]).collect())
    }

    /// One value per sweep point for the named output, in sweep-point order.
    pub fn values_of_output(&self, name: &str) -> Result<&[Value]> {
        self.output_columns
            .iter()
            .find(|(output_name, _)| names_match(output_name, name))
            .map(|(_, column)| column.as_slice())
            .ok_or_else(|| ClientError::NotFound(format!("output \"{name}\"")))
    }

    /// Transposed table: a header row of input names followed by output names,
    /// then one row per sweep point concatenating that point's input values
    /// with its output values.
    pub fn raw_table(&self) -> Vec<Vec<Value>> {
        let header: Vec<Value> = self
            .input_names
            .iter()
            .chain(self.output_columns.iter().map(|(name, _)| name))
            .map(|name| Value::String(name.clone()))
            .collect();

        let mut table = Vec::with_capacity(self.input_rows.len() + 1);
        table.push(header);
        for (index, input_row) in self.input_rows.iter().enumerate() {
            let mut row = input_row.clone();
            row.extend(
                self.output_columns
                    .iter()
                    .map(|(_, column)| column[index].clone()),
            );
            table.push(row);
        }
        table
    }
}

#[cfg(test)]
#[path = "tests/outputs_tests.rs"]
mod tests;
