//! Framebuffer backend lifecycle.
//!
//! [`FbDev::create`] brings the board up, hands both drawing primitives to
//! the accelerator, clears layer 1 and builds the compositor screen. From
//! then on the main loop drives the backend through its work item.

use dma2d::color::C_BLUE;
use dma2d::{Blitter, BlitterInterface, FrameMemory, Layer, LayerBuffer};
use embedded_graphics::{draw_target::DrawTarget, geometry::OriginDimensions, pixelcolor::Rgb565};
use embedded_hal::delay::DelayNs;

use crate::bringup::{Peripherals, Stage};
use crate::error::FbDevError;
use crate::gui::{Accelerator, Gui};
use crate::heartbeat::{Heartbeat, SystickConfig};
use crate::registry::{Driver, Primitive};
use crate::screen::Screen;
use crate::work::{WorkPriority, WorkQueue};

/// Something that draws into one of the two framebuffer layers.
pub trait LayerTarget {
    fn select_layer(&mut self, layer: Layer);
}

impl<I, D> LayerTarget for Blitter<I, D>
where
    I: BlitterInterface,
    D: DelayNs,
{
    fn select_layer(&mut self, layer: Layer) {
        self.set_work_layer(layer);
    }
}

impl<B> LayerTarget for LayerBuffer<B>
where
    B: FrameMemory,
{
    fn select_layer(&mut self, layer: Layer) {
        self.set_work_layer(layer);
    }
}

pub struct FbDev<S, D, A, P>
where
    S: Screen,
    D: DrawTarget<Color = Rgb565> + OriginDimensions + LayerTarget,
    D::Error: core::fmt::Debug,
    A: Accelerator + LayerTarget,
    P: Peripherals,
{
    gui: Gui<D, A>,
    screen: Option<S>,
    peripherals: P,
    heartbeat: &'static Heartbeat,
    xres: u16,
    yres: u16,
}

impl<S, D, A, P> FbDev<S, D, A, P>
where
    S: Screen,
    D: DrawTarget<Color = Rgb565> + OriginDimensions + LayerTarget,
    D::Error: core::fmt::Debug,
    A: Accelerator + LayerTarget,
    P: Peripherals,
{
    /// Bring the board up and create the compositor screen.
    ///
    /// `create_screen` receives the display width and height. The redisplay
    /// work item is added to `queue` once everything is in place.
    ///
    /// # Errors
    ///
    /// - [`FbDevError::BringUp`] naming the first board step that failed
    /// - [`FbDevError::Heartbeat`] if SysTick cannot run at the heartbeat rate
    /// - [`FbDevError::Draw`] if clearing the screen failed
    /// - [`FbDevError::ScreenCreate`] if `create_screen` returned `None`
    pub fn create<F>(
        mut peripherals: P,
        mut gui: Gui<D, A>,
        heartbeat: &'static Heartbeat,
        create_screen: F,
        queue: &mut WorkQueue<Self>,
    ) -> Result<Self, FbDevError<P::Error>>
    where
        F: FnOnce(u16, u16) -> Option<S>,
    {
        log::info!("[FBDEV] Bring-up");
        Self::bring_up(&mut peripherals, &mut gui)?;

        let xres = gui.width().min(u16::MAX as u32) as u16;
        let yres = gui.height().min(u16::MAX as u32) as u16;

        let mut fbdev = Self {
            gui,
            screen: None,
            peripherals,
            heartbeat,
            xres,
            yres,
        };

        fbdev.draw_layer(Layer::L1);
        fbdev.show_layer(Layer::L1);
        if let Err(e) = fbdev.gui.fill_screen(C_BLUE) {
            log::error!("[FBDEV] Initial clear failed: {:?}", e);
            return Err(FbDevError::Draw);
        }

        let screen = create_screen(xres, yres).ok_or(FbDevError::ScreenCreate)?;
        fbdev.screen = Some(screen);

        queue.add(Self::work, WorkPriority::Redisplay);
        log::info!("[FBDEV] Ready, {}x{}", xres, yres);
        Ok(fbdev)
    }

    fn bring_up(peripherals: &mut P, gui: &mut Gui<D, A>) -> Result<(), FbDevError<P::Error>> {
        stage(Stage::System, peripherals.init_system())?;
        stage(Stage::Sdram, peripherals.init_sdram())?;
        stage(Stage::Ltdc, peripherals.init_ltdc())?;
        stage(Stage::Panel, peripherals.init_panel())?;
        stage(Stage::Touch, peripherals.init_touch())?;

        let reload = SystickConfig::new(peripherals.core_clock_hz())
            .reload()
            .map_err(FbDevError::Heartbeat)?;
        stage(Stage::Heartbeat, peripherals.start_heartbeat(reload))?;

        gui.register(Driver::DrawLine(A::draw_line));
        gui.register(Driver::FillFrame(A::fill_frame));
        gui.enable(Primitive::DrawLine);
        gui.enable(Primitive::FillFrame);
        Ok(())
    }

    /// Flush screen damage through the span bridge. Always stays queued.
    pub fn work(&mut self) -> bool {
        if let Some(screen) = self.screen.as_mut() {
            if screen.has_damage() {
                screen.update(&mut self.gui);
            }
        }
        true
    }

    /// Called when the display becomes active.
    pub fn activate(&mut self) -> bool {
        self.work();
        true
    }

    /// Send all drawing to `layer`, software and accelerated alike.
    pub fn draw_layer(&mut self, layer: Layer) {
        log::debug!("[FBDEV] Drawing to {:?}", layer);
        self.gui.target_mut().select_layer(layer);
        self.gui.accelerator_mut().select_layer(layer);
    }

    /// Scan out `layer`.
    pub fn show_layer(&mut self, layer: Layer) {
        self.peripherals.show_layer(layer);
    }

    pub fn gui(&self) -> &Gui<D, A> {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui<D, A> {
        &mut self.gui
    }

    pub fn screen(&self) -> Option<&S> {
        self.screen.as_ref()
    }

    pub fn screen_mut(&mut self) -> Option<&mut S> {
        self.screen.as_mut()
    }

    /// Detach the screen; later work passes draw nothing.
    pub fn take_screen(&mut self) -> Option<S> {
        self.screen.take()
    }

    pub fn peripherals(&self) -> &P {
        &self.peripherals
    }

    pub fn heartbeat(&self) -> &'static Heartbeat {
        self.heartbeat
    }

    pub fn width(&self) -> u16 {
        self.xres
    }

    pub fn height(&self) -> u16 {
        self.yres
    }
}

fn stage<E>(stage: Stage, result: Result<(), E>) -> Result<(), FbDevError<E>> {
    log::info!("[FBDEV] {:?}", stage);
    result.map_err(|source| FbDevError::BringUp { stage, source })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gui::tests::{accelerated_gui, software_target, Recorder};
    use crate::screen::DamageScreen;
    use alloc::vec::Vec;
    use dma2d::LayerBuffer;

    impl LayerTarget for Recorder {
        fn select_layer(&mut self, layer: Layer) {
            self.layer = layer;
        }
    }

    /// Board that records what was called and can fail at one stage.
    #[derive(Default)]
    pub(crate) struct MockBoard {
        pub calls: Vec<Stage>,
        pub fail_at: Option<Stage>,
        pub clock_hz: u32,
        pub reload: Option<u32>,
        pub shown: Vec<Layer>,
    }

    impl MockBoard {
        pub(crate) fn new() -> Self {
            Self {
                clock_hz: 180_000_000,
                ..Self::default()
            }
        }

        fn step(&mut self, stage: Stage) -> Result<(), &'static str> {
            self.calls.push(stage);
            if self.fail_at == Some(stage) {
                return Err("board fault");
            }
            Ok(())
        }
    }

    impl Peripherals for MockBoard {
        type Error = &'static str;

        fn init_system(&mut self) -> Result<(), Self::Error> {
            self.step(Stage::System)
        }

        fn init_sdram(&mut self) -> Result<(), Self::Error> {
            self.step(Stage::Sdram)
        }

        fn init_ltdc(&mut self) -> Result<(), Self::Error> {
            self.step(Stage::Ltdc)
        }

        fn init_panel(&mut self) -> Result<(), Self::Error> {
            self.step(Stage::Panel)
        }

        fn init_touch(&mut self) -> Result<(), Self::Error> {
            self.step(Stage::Touch)
        }

        fn core_clock_hz(&self) -> u32 {
            self.clock_hz
        }

        fn start_heartbeat(&mut self, reload: u32) -> Result<(), Self::Error> {
            self.reload = Some(reload);
            self.step(Stage::Heartbeat)
        }

        fn show_layer(&mut self, layer: Layer) {
            self.shown.push(layer);
        }
    }

    type TestDev = FbDev<DamageScreen, LayerBuffer<Vec<u16>>, Recorder, MockBoard>;

    static HEARTBEAT: Heartbeat = Heartbeat::new();

    fn plain_gui() -> Gui<LayerBuffer<Vec<u16>>, Recorder> {
        Gui::new(software_target(), Recorder::default())
    }

    fn create(board: MockBoard, queue: &mut WorkQueue<TestDev>) -> Result<TestDev, FbDevError<&'static str>> {
        FbDev::create(
            board,
            plain_gui(),
            &HEARTBEAT,
            |w, h| Some(DamageScreen::new(w, h, 0)),
            queue,
        )
    }

    #[test]
    fn create_runs_bring_up_in_order() {
        let mut queue = WorkQueue::new();
        let dev = create(MockBoard::new(), &mut queue).unwrap();

        assert_eq!(
            dev.peripherals().calls,
            [
                Stage::System,
                Stage::Sdram,
                Stage::Ltdc,
                Stage::Panel,
                Stage::Touch,
                Stage::Heartbeat,
            ]
        );
        assert_eq!(dev.peripherals().reload, Some(1_799_999));
        assert_eq!(dev.peripherals().shown, [Layer::L1]);
        assert_eq!((dev.width(), dev.height()), (32, 16));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn create_enables_both_drivers_and_clears_to_blue() {
        let mut queue = WorkQueue::new();
        let dev = create(MockBoard::new(), &mut queue).unwrap();

        assert!(dev.gui().drivers().is_enabled(Primitive::DrawLine));
        assert!(dev.gui().drivers().is_enabled(Primitive::FillFrame));
        assert_eq!(dev.gui().accelerator().fills, [(0, 0, 31, 15, C_BLUE)]);
        assert_eq!(dev.gui().accelerator().layer, Layer::L1);
    }

    #[test]
    fn create_stops_at_first_failed_stage() {
        let mut board = MockBoard::new();
        board.fail_at = Some(Stage::Ltdc);
        let mut queue = WorkQueue::new();

        match create(board, &mut queue) {
            Err(FbDevError::BringUp { stage, source }) => {
                assert_eq!(stage, Stage::Ltdc);
                assert_eq!(source, "board fault");
            }
            _ => panic!("expected LTDC bring-up failure"),
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn create_rejects_unusable_core_clock() {
        let mut board = MockBoard::new();
        board.clock_hz = 50;
        let mut queue = WorkQueue::new();

        assert!(matches!(
            create(board, &mut queue),
            Err(FbDevError::Heartbeat(_))
        ));
    }

    #[test]
    fn create_fails_without_screen() {
        let mut queue = WorkQueue::<TestDev>::new();
        let result = FbDev::create(
            MockBoard::new(),
            plain_gui(),
            &HEARTBEAT,
            |_, _| None,
            &mut queue,
        );

        assert!(matches!(result, Err(FbDevError::ScreenCreate)));
        assert!(queue.is_empty());
    }

    #[test]
    fn work_flushes_damage_as_lines() {
        let mut queue = WorkQueue::new();
        let mut dev = create(MockBoard::new(), &mut queue).unwrap();

        // Initial full-screen damage: one line per row.
        assert!(dev.work());
        assert_eq!(dev.gui().accelerator().lines.len(), 16);

        dev.screen_mut().unwrap().fill(4, 2, 9, 2, 0xFF00_FF00);
        assert_eq!(queue.run(&mut dev), 1);
        assert_eq!(dev.gui().accelerator().lines.len(), 17);
        assert_eq!(
            dev.gui().accelerator().lines[16],
            (4, 2, 9, 2, 0xFF00_FF00)
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn work_without_screen_draws_nothing() {
        let mut queue = WorkQueue::new();
        let mut dev = create(MockBoard::new(), &mut queue).unwrap();
        assert!(dev.take_screen().is_some());

        assert!(dev.work());
        assert!(dev.activate());
        assert!(dev.gui().accelerator().lines.is_empty());
    }

    #[test]
    fn activate_redisplays() {
        let mut queue = WorkQueue::new();
        let mut dev = create(MockBoard::new(), &mut queue).unwrap();

        assert!(dev.activate());
        assert!(!dev.screen().unwrap().has_damage());
        assert_eq!(dev.gui().accelerator().lines.len(), 16);
    }

    #[test]
    fn draw_layer_switches_both_paths() {
        let mut queue = WorkQueue::new();
        let mut dev = create(MockBoard::new(), &mut queue).unwrap();

        dev.draw_layer(Layer::L2);
        dev.show_layer(Layer::L2);
        assert_eq!(dev.gui().accelerator().layer, Layer::L2);
        assert_eq!(dev.gui().target().work_layer(), Layer::L2);
        assert_eq!(dev.peripherals().shown, [Layer::L1, Layer::L2]);

        dev.gui_mut().draw_line(0, 0, 3, 3, 0xFFFF_FFFF).unwrap();
        assert_eq!(dev.gui().target().pixel(Layer::L2, 3, 3), Some(0xFFFF));
        assert_eq!(dev.gui().target().pixel(Layer::L1, 3, 3), Some(0));
    }

    #[test]
    fn pre_registered_gui_is_accepted() {
        let mut queue = WorkQueue::new();
        let dev = FbDev::create(
            MockBoard::new(),
            accelerated_gui(),
            &HEARTBEAT,
            |w, h| Some(DamageScreen::new(w, h, 0)),
            &mut queue,
        )
        .unwrap();
        assert!(dev.gui().drivers().is_registered(Primitive::FillFrame));
    }
}
