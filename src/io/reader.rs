use binary_reader::BinaryReader;

pub trait DirectorExt {
    fn read_pascal_string(&mut self) -> Result<String, std::io::Error>;
    fn read_string(&mut self, len: usize) -> Result<String, std::io::Error>;
    fn read_apple_float_80(&mut self) -> Result<f64, std::io::Error>;
    fn read_i16_at(&mut self, pos: usize) -> Result<i16, std::io::Error>;
    fn eof(&self) -> bool;
    fn bytes_left(&self) -> usize;
}

impl DirectorExt for BinaryReader {
    fn bytes_left(&self) -> usize {
        self.length.saturating_sub(self.pos)
    }

    fn read_pascal_string(&mut self) -> Result<String, std::io::Error> {
        let len = self.read_u8()? as usize;
        self.read_string(len)
    }

    /// Director strings are ISO-8859-1, so every byte maps to the code point of the same value.
    fn read_string(&mut self, len: usize) -> Result<String, std::io::Error> {
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn read_apple_float_80(&mut self) -> Result<f64, std::io::Error> {
        // Floats are stored as an "80 bit IEEE Standard 754 floating
        // point number (Standard Apple Numeric Environment [SANE] data type
        // Extended). The mantissa carries an explicit integer bit.
        let data = self.read_bytes(10)?;
        let exponent = u16::from_be_bytes([data[0], data[1]]);
        let negative = exponent & 0x8000 != 0;
        let exponent = (exponent & 0x7fff) as i32;

        let fraction = u64::from_be_bytes([
            data[2], data[3], data[4], data[5], data[6], data[7], data[8], data[9],
        ]);
        let mantissa = (fraction as f64 * 2.0) / 18446744073709551616.0;
        let value = mantissa * 2f64.powi(exponent - 16383);

        Ok(if negative { -value } else { value })
    }

    fn read_i16_at(&mut self, pos: usize) -> Result<i16, std::io::Error> {
        self.jmp(pos);
        self.read_i16()
    }

    fn eof(&self) -> bool {
        self.pos >= self.length
    }
}
