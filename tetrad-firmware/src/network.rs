//! Wi-Fi and time synchronisation
//!
//! Brings up the CYW43 radio and the DHCP stack once at boot. Joining
//! the access point happens later, when the application asks for it,
//! so the startup message can scroll first.

use core::net::{IpAddr, Ipv4Addr, SocketAddr};

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Config, DhcpConfig, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::Peri;
use embassy_time::{with_timeout, Duration, Instant};
use sntpc::{get_time, NtpContext, NtpTimestampGenerator};
use static_cell::StaticCell;

use tetrad_core::config::NetworkConfig;
use tetrad_hal_rp2040::RadioPins;

use crate::tasks::{cyw43_task, net_task};
use crate::{Fault, Irqs};

const CYW43_FIRMWARE: &[u8] = include_bytes!("../cyw43-firmware/43439A0.bin");
const CYW43_CLM: &[u8] = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

/// Credentials baked in at build time
const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");
const WIFI_PASSWORD: Option<&str> = option_env!("WIFI_PASSWORD");

/// Sockets: control server, SNTP, DHCP, spare
const SOCKET_COUNT: usize = 4;

const NTP_PORT: u16 = 123;
const NTP_TIMEOUT: Duration = Duration::from_secs(5);

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<SOCKET_COUNT>> = StaticCell::new();

/// What a connect attempt produced
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOutcome {
    /// Address assigned by DHCP
    pub address: Option<[u8; 4]>,
    /// Unix seconds and the monotonic millisecond they were taken at
    pub time: Option<(u64, u64)>,
}

/// Radio control plus IP stack
pub struct Network {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
}

impl Network {
    /// Power up the radio and start the stack runners
    pub async fn init(
        spawner: Spawner,
        radio: RadioPins,
        pio0: Peri<'static, PIO0>,
        dma: Peri<'static, DMA_CH0>,
        config: &NetworkConfig,
        seed: u64,
    ) -> Result<Self, Fault> {
        let pwr = Output::new(radio.power, Level::Low);
        let cs = Output::new(radio.cs, Level::High);
        let mut pio = Pio::new(pio0, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            DEFAULT_CLOCK_DIVIDER,
            pio.irq0,
            cs,
            radio.dio,
            radio.clk,
            dma,
        );

        let state = CYW43_STATE.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, CYW43_FIRMWARE).await;
        spawner.spawn(cyw43_task(runner)).map_err(|_| Fault::Spawn)?;

        control.init(CYW43_CLM).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        let mut dhcp = DhcpConfig::default();
        dhcp.hostname = Some(config.hostname.clone());

        let (stack, runner) = embassy_net::new(
            net_device,
            Config::dhcpv4(dhcp),
            RESOURCES.init(StackResources::new()),
            seed,
        );
        spawner.spawn(net_task(runner)).map_err(|_| Fault::Spawn)?;

        info!("Radio up, hostname {}", config.hostname.as_str());
        Ok(Self { control, stack })
    }

    /// Stack handle for sockets
    pub fn stack(&self) -> Stack<'static> {
        self.stack
    }

    /// Join, wait for an address, then try one time sync
    ///
    /// Never fails: a missing SSID, a join error or a timeout all yield
    /// an outcome without an address.
    pub async fn connect(&mut self, config: &NetworkConfig) -> ConnectOutcome {
        let Some(ssid) = WIFI_SSID.filter(|s| !s.is_empty()) else {
            warn!("No WIFI_SSID configured at build time");
            return ConnectOutcome::default();
        };

        info!("Joining {}", ssid);
        let budget = Duration::from_secs(u64::from(config.connect_timeout_s));
        let address = match with_timeout(budget, self.join(ssid)).await {
            Ok(Some(address)) => address,
            Ok(None) => return ConnectOutcome::default(),
            Err(_) => {
                warn!("Wi-Fi connect timed out");
                return ConnectOutcome::default();
            }
        };
        info!(
            "Address {}.{}.{}.{}",
            address[0], address[1], address[2], address[3]
        );

        let time = self.sync_time(config.ntp_server).await;
        ConnectOutcome {
            address: Some(address),
            time,
        }
    }

    async fn join(&mut self, ssid: &str) -> Option<[u8; 4]> {
        let options = match WIFI_PASSWORD.filter(|p| !p.is_empty()) {
            Some(password) => JoinOptions::new(password.as_bytes()),
            None => JoinOptions::new_open(),
        };
        if let Err(e) = self.control.join(ssid, options).await {
            warn!("Wi-Fi join failed: status={}", e.status);
            return None;
        }

        self.stack.wait_link_up().await;
        self.stack.wait_config_up().await;
        self.stack
            .config_v4()
            .map(|config| config.address.address().octets())
    }

    /// Best-effort SNTP query
    async fn sync_time(&self, server: [u8; 4]) -> Option<(u64, u64)> {
        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; 256];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; 256];

        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        if socket.bind(0).is_err() {
            warn!("SNTP: failed to bind socket");
            return None;
        }

        let [a, b, c, d] = server;
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(a, b, c, d)), NTP_PORT);
        let context = NtpContext::new(UptimeTimestamp::new());

        match with_timeout(NTP_TIMEOUT, get_time(addr, &socket, context)).await {
            Ok(Ok(result)) => {
                // sntpc reports seconds on the Unix epoch
                let unix = u64::from(result.sec());
                info!("SNTP: {} s since epoch", unix);
                Some((unix, Instant::now().as_millis()))
            }
            Ok(Err(e)) => {
                warn!("SNTP request failed: {:?}", Debug2Format(&e));
                None
            }
            Err(_) => {
                warn!("SNTP request timed out");
                None
            }
        }
    }
}

/// Local timestamps for the SNTP exchange, counted from boot
#[derive(Clone, Copy)]
struct UptimeTimestamp {
    start: Instant,
}

impl UptimeTimestamp {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl NtpTimestampGenerator for UptimeTimestamp {
    fn init(&mut self) {
        self.start = Instant::now();
    }

    fn timestamp_sec(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        (self.start.elapsed().as_micros() % 1_000_000) as u32
    }
}
