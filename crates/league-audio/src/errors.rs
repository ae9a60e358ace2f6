use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("File not found: {path}")]
    #[diagnostic(
        code(file::not_found),
        help("Make sure the file exists and the path is correct")
    )]
    FileNotFound { path: Utf8PathBuf },

    #[error("Could not read audio container: {path}")]
    #[diagnostic(
        code(container::invalid),
        help("The file must be a Wwise soundbank (.bnk) or an audio package (.wpk)")
    )]
    InvalidContainer {
        path: Utf8PathBuf,
        #[source]
        source: ltk_audio_tree::Error,
    },

    #[error("Audio {id} is not part of {path}")]
    #[diagnostic(
        code(audio::not_found),
        help("Run 'league-audio tree -f <file>' to list the audio ids in the container")
    )]
    AudioNotFound { id: u32, path: Utf8PathBuf },

    #[error("No replacement files found in {dir}")]
    #[diagnostic(
        code(repack::no_matches),
        help("Replacement files must be named after the audio id they replace, e.g. 12345.wem")
    )]
    NothingToReplace { dir: Utf8PathBuf },

    #[error("Failed to write {path}")]
    #[diagnostic(
        code(container::write_failed),
        help("A container needs at least one audio file")
    )]
    SaveFailed {
        path: Utf8PathBuf,
        #[source]
        source: ltk_audio_tree::Error,
    },

    #[error("Directory creation failed")]
    #[diagnostic(
        code(fs::create_dir_failed),
        help("Check file permissions and available disk space")
    )]
    DirectoryCreationFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn file_not_found(path: Utf8PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_container(path: Utf8PathBuf, source: ltk_audio_tree::Error) -> Self {
        Self::InvalidContainer { path, source }
    }

    pub fn audio_not_found(id: u32, path: Utf8PathBuf) -> Self {
        Self::AudioNotFound { id, path }
    }

    pub fn save_failed(path: Utf8PathBuf, source: ltk_audio_tree::Error) -> Self {
        Self::SaveFailed { path, source }
    }

    pub fn directory_creation_failed(path: Utf8PathBuf, source: std::io::Error) -> Self {
        Self::DirectoryCreationFailed { path, source }
    }
}
