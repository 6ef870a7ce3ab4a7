use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fail to create metrics collector, error: {source}"))]
    CreateCollector { source: prometheus::Error },

    #[snafu(display("Fail to register metrics collector, error: {source}"))]
    RegisterCollector { source: prometheus::Error },

    #[snafu(display("Error occurs while binding metrics TCP server, error: {source}"))]
    BindTcpServer { source: std::io::Error },

    #[snafu(display("Error occurs while serving metrics HTTP server, error: {source}"))]
    ServeHttpServer { source: std::io::Error },
}
