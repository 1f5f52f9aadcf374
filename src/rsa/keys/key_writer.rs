use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::rsa::keys::{KeyError, PrivateKey, PublicKey};

pub struct KeyWriter<W: Write> {
    writer: W,
}

impl<W: Write> KeyWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_public(&mut self, key: &PublicKey) -> Result<(), KeyError> {
        write!(self.writer, "{:x}\n{:x}\n{:x}\n{}\n", key.n, key.e, key.signature, key.owner)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_private(&mut self, key: &PrivateKey) -> Result<(), KeyError> {
        write!(self.writer, "{:x}\n{:x}\n", key.n, key.d)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let f = OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    // mode() only applies on creation
    f.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(f)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

impl PublicKey {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyError> {
        KeyWriter::new(BufWriter::new(File::create(path)?)).write_public(self)
    }
}

impl PrivateKey {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyError> {
        KeyWriter::new(BufWriter::new(create_private_file(path.as_ref())?)).write_private(self)
    }
}
