use std::fs::File;
use std::io::{BufRead, BufReader};

use log::debug;

use crate::dataloader::DataLoader;
use crate::err::NetworkError;
use crate::util::Float;

/// On-disk row dataset. The first line is
/// `inputs_length outputs_length element_count`, followed by
/// `element_count` lines of `inputs_length + outputs_length` reals; the
/// first `inputs_length` values of each row form the input vector, the
/// remainder the expected output vector.
#[derive(Debug)]
pub struct PlainTextDataset {
    inputs_length: usize,
    outputs_length: usize,
    inputs: Vec<Vec<Float>>,
    outputs: Vec<Vec<Float>>,
}

impl PlainTextDataset {
    pub fn empty() -> Self {
        Self {
            inputs_length: 0,
            outputs_length: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut ds = PlainTextDataset::empty();
        ds.reload(path)?;
        Ok(ds)
    }

    /// Discards any loaded rows and re-reads the file. A malformed
    /// header, a short file, a row of the wrong width or a non-numeric
    /// value all reject the whole file.
    pub fn reload(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(Box::new(NetworkError::InvalidFormat(
                    "missing header line".to_owned(),
                )))
            }
        };

        let header_vals = Self::parse_header(&header)?;
        let (inputs_length, outputs_length, elements) = header_vals;

        let mut inputs = Vec::with_capacity(elements);
        let mut outputs = Vec::with_capacity(elements);

        for i in 0..elements {
            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(Box::new(NetworkError::InvalidFormat(format!(
                        "expected {} elements, file ends after {}",
                        elements, i
                    ))))
                }
            };

            let (input, output) = Self::parse_row(&line, inputs_length, outputs_length)?;
            inputs.push(input);
            outputs.push(output);
        }

        self.inputs_length = inputs_length;
        self.outputs_length = outputs_length;
        self.inputs = inputs;
        self.outputs = outputs;

        debug!(
            "[ok] dataset loaded : {} elements of {}+{} values",
            elements, inputs_length, outputs_length
        );

        Ok(())
    }

    fn parse_header(header: &str) -> Result<(usize, usize, usize), NetworkError> {
        let mut values = Vec::with_capacity(3);

        for field in header.split_whitespace() {
            let parsed = field.parse::<usize>().map_err(|_| {
                NetworkError::InvalidFormat(format!("bad header field '{}'", field))
            })?;
            values.push(parsed);
        }

        if values.len() != 3 {
            return Err(NetworkError::InvalidFormat(format!(
                "header needs 3 fields, found {}",
                values.len()
            )));
        }

        Ok((values[0], values[1], values[2]))
    }

    fn parse_row(
        line: &str,
        inputs_length: usize,
        outputs_length: usize,
    ) -> Result<(Vec<Float>, Vec<Float>), NetworkError> {
        let mut input = Vec::with_capacity(inputs_length);
        let mut output = Vec::with_capacity(outputs_length);

        for (idx, field) in line.split_whitespace().enumerate() {
            let value = field.parse::<Float>().map_err(|_| {
                NetworkError::InvalidFormat(format!("bad row value '{}'", field))
            })?;

            if idx < inputs_length {
                input.push(value);
            } else {
                output.push(value);
            }
        }

        if input.len() != inputs_length || output.len() != outputs_length {
            return Err(NetworkError::InvalidFormat(format!(
                "row has {} values, expected {}",
                input.len() + output.len(),
                inputs_length + outputs_length
            )));
        }

        Ok((input, output))
    }
}

impl DataLoader for PlainTextDataset {
    fn elements(&self) -> usize {
        self.inputs.len()
    }

    fn input(&self, index: usize) -> Result<&[Float], NetworkError> {
        match self.inputs.get(index) {
            Some(row) => Ok(row),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.inputs.len(),
            }),
        }
    }

    fn expected(&self, index: usize) -> Result<&[Float], NetworkError> {
        match self.outputs.get(index) {
            Some(row) => Ok(row),
            None => Err(NetworkError::IndexOutOfRange {
                index,
                len: self.outputs.len(),
            }),
        }
    }

    fn inputs_length(&self) -> usize {
        self.inputs_length
    }

    fn outputs_length(&self) -> usize {
        self.outputs_length
    }
}
